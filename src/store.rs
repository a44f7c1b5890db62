//! Mutation notifications shared between screens.
//!
//! Forms and delete actions publish a [`ChangeEvent`] after the server
//! accepts a mutation; list screens hold a [`ChangeSubscription`] and refetch
//! once per batch of pending events.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub resource: String,
    pub kind: ChangeKind,
    pub id: String,
}

impl ChangeEvent {
    pub fn new(resource: impl Into<String>, kind: ChangeKind, id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            kind,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ChangeEvent) -> usize {
        debug!("publishing {:?} {} on {}", event.kind, event.id, event.resource);
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, resource: impl Into<String>) -> ChangeSubscription {
        ChangeSubscription {
            resource: resource.into(),
            receiver: self.sender.subscribe(),
        }
    }
}

pub struct ChangeSubscription {
    resource: String,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Consumes every pending event and returns how many concerned this
    /// resource. A lagged receiver counts as one change.
    pub fn drain(&mut self) -> usize {
        let mut pending = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if event.resource == self.resource {
                        pending += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("change subscription for {} lagged by {}", self.resource, skipped);
                    pending += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_filters_by_resource() {
        let bus = ChangeBus::default();
        let mut tasks = bus.subscribe("tasks");

        bus.publish(ChangeEvent::new("tasks", ChangeKind::Created, "1"));
        bus.publish(ChangeEvent::new("drinks", ChangeKind::Deleted, "2"));
        bus.publish(ChangeEvent::new("tasks", ChangeKind::Updated, "1"));

        assert_eq!(tasks.drain(), 2);
        assert_eq!(tasks.drain(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = ChangeBus::default();
        assert_eq!(bus.publish(ChangeEvent::new("tasks", ChangeKind::Created, "1")), 0);
    }

    #[test]
    fn lag_still_reports_a_change() {
        let bus = ChangeBus::new(1);
        let mut tasks = bus.subscribe("tasks");
        for id in 0..4 {
            bus.publish(ChangeEvent::new("tasks", ChangeKind::Created, id.to_string()));
        }
        assert!(tasks.drain() >= 1);
    }
}

use tracing::{debug, error, warn};

use crate::client::{ClientError, SharedClient};
use crate::models::Record;
use crate::scope::ScreenScope;
use crate::store::{ChangeBus, ChangeEvent, ChangeKind, ChangeSubscription};

pub const DELETE_PROMPT_TITLE: &str = "Confirm delete";
pub const DELETE_PROMPT_MESSAGE: &str = "Are you sure you want to delete this item?";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Ready(Vec<Record>),
    Failed(ClientError),
}

pub trait Confirm {
    fn confirm(&self, title: &str, message: &str) -> bool;
}

impl Confirm for bool {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        *self
    }
}

impl<F> Confirm for F
where
    F: Fn(&str, &str) -> bool,
{
    fn confirm(&self, title: &str, message: &str) -> bool {
        self(title, message)
    }
}

/// Records whose `field` contains `query`, case-insensitively, in collection
/// order. An empty query keeps everything.
pub fn filter_records<'a>(records: &'a [Record], field: &str, query: &str) -> Vec<&'a Record> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .text(field)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
        .collect()
}

pub struct ListController {
    client: SharedClient,
    display_field: String,
    state: ListState,
    filter: String,
    bus: ChangeBus,
    changes: ChangeSubscription,
    scope: ScreenScope,
}

impl ListController {
    pub fn new(
        client: SharedClient,
        display_field: impl Into<String>,
        bus: &ChangeBus,
        scope: ScreenScope,
    ) -> Self {
        let changes = bus.subscribe(client.resource());
        Self {
            client,
            display_field: display_field.into(),
            state: ListState::Loading,
            filter: String::new(),
            bus: bus.clone(),
            changes,
            scope,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    pub fn error(&self) -> Option<&ClientError> {
        match &self.state {
            ListState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn records(&self) -> &[Record] {
        match &self.state {
            ListState::Ready(records) => records,
            _ => &[],
        }
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records().iter().find(|r| r.id == id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    pub fn visible(&self) -> Vec<&Record> {
        filter_records(self.records(), &self.display_field, &self.filter)
    }

    pub async fn refresh(&mut self) -> &ListState {
        if !self.scope.is_active() {
            return &self.state;
        }

        // pending change notifications are covered by this fetch
        self.changes.drain();
        self.state = ListState::Loading;

        match self.scope.run(self.client.list()).await {
            Some(Ok(records)) => {
                debug!("loaded {} {}", records.len(), self.client.resource());
                self.state = ListState::Ready(records);
            }
            Some(Err(e)) => {
                warn!("Error fetching {}: {}", self.client.resource(), e);
                self.state = ListState::Failed(e);
            }
            None => {
                debug!("refresh of {} dropped, screen torn down", self.client.resource());
            }
        }

        &self.state
    }

    /// Refetches once if any change to this resource was published since the
    /// last fetch. Returns whether a refetch happened.
    pub async fn sync(&mut self) -> bool {
        if self.changes.drain() == 0 {
            return false;
        }
        self.refresh().await;
        true
    }

    /// A failed delete is only logged; the list is left as it was.
    pub async fn request_delete(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(DELETE_PROMPT_TITLE, DELETE_PROMPT_MESSAGE) {
            return false;
        }

        match self.scope.run(self.client.delete(id)).await {
            Some(Ok(())) => {
                self.bus.publish(ChangeEvent::new(
                    self.client.resource(),
                    ChangeKind::Deleted,
                    id,
                ));
                self.refresh().await;
                true
            }
            Some(Err(e)) => {
                error!("Error deleting {} {}: {}", self.client.resource(), id, e);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fields;
    use serde_json::json;

    fn record(id: &str, title: &str) -> Record {
        let mut fields = Fields::new();
        fields.insert("title".into(), json!(title));
        Record::new(id, fields)
    }

    #[test]
    fn empty_query_keeps_everything() {
        let mut untitled = record("3", "");
        untitled.fields.remove("title");
        let records = vec![record("1", "Buy milk"), record("2", "Walk dog"), untitled];
        assert_eq!(filter_records(&records, "title", "").len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_and_ordered() {
        let records = vec![
            record("1", "Buy MILK"),
            record("2", "Walk dog"),
            record("3", "milkshake"),
        ];
        let ids: Vec<_> = filter_records(&records, "title", "Milk")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn filtered_view_is_an_ordered_matching_subsequence() {
        let titles = [
            "Buy milk", "Walk dog", "MILK the cow", "Call Mom", "dog food", "",
            "Ünïcode café", "buy MILKshake", "m", "Walk", "12 eggs",
        ];
        let records: Vec<Record> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| record(&i.to_string(), t))
            .collect();
        let queries = [
            "", "m", "M", "milk", "MiLk", "dog", "walk ", "café", "CAFÉ", "2 e", "zzz", " ", "buy",
        ];

        for query in queries {
            let visible = filter_records(&records, "title", query);

            // subsequence of the collection, in collection order
            let positions = visible
                .iter()
                .map(|v| records.iter().position(|r| std::ptr::eq(r, *v)).unwrap());
            let mut last = None;
            for pos in positions {
                assert!(last.is_none_or(|l| l < pos), "order broken for {:?}", query);
                last = Some(pos);
            }

            // exactly the records that contain the query
            let needle = query.to_lowercase();
            for r in &records {
                let title = r.text("title").unwrap().to_lowercase();
                let shown = visible.iter().any(|v| std::ptr::eq(*v, r));
                assert_eq!(shown, title.contains(&needle), "{:?} vs {:?}", query, title);
            }
        }

        assert_eq!(filter_records(&records, "title", "").len(), records.len());
    }

    #[test]
    fn records_without_the_field_do_not_match() {
        let mut untitled = record("1", "");
        untitled.fields.remove("title");
        assert!(filter_records(&[untitled], "title", "a").is_empty());
    }

    #[test]
    fn closures_can_confirm() {
        let asked = |title: &str, _: &str| title == DELETE_PROMPT_TITLE;
        assert!(asked.confirm(DELETE_PROMPT_TITLE, DELETE_PROMPT_MESSAGE));
        assert!(!false.confirm(DELETE_PROMPT_TITLE, DELETE_PROMPT_MESSAGE));
    }
}

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::{ClientError, ClientResult, ResourceClient};
use crate::models::{Fields, Record};

/// A request seen by [`MemoryResource`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(Fields),
    Update(String, Fields),
    Delete(String),
}

/// In-process collection with mockapi-style semantics: sequential string
/// ids, insertion order, and field merge on update.
pub struct MemoryResource {
    name: String,
    latency: Option<Duration>,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<Record>,
    next_id: u64,
    failures: VecDeque<ClientError>,
    calls: Vec<Call>,
}

impl MemoryResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_records(name, Vec::new())
    }

    pub fn with_records(name: impl Into<String>, records: Vec<Record>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            name: name.into(),
            latency: None,
            state: Mutex::new(MemoryState {
                records,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Delay every response, to exercise screens torn down mid-request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue an error returned by the next call instead of its result.
    pub async fn fail_next(&self, error: ClientError) {
        self.state.lock().await.failures.push_back(error);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    pub async fn records(&self) -> Vec<Record> {
        self.state.lock().await.records.clone()
    }

    async fn begin(&self, call: Call) -> ClientResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for MemoryResource {
    fn resource(&self) -> &str {
        &self.name
    }

    async fn list(&self) -> ClientResult<Vec<Record>> {
        self.begin(Call::List).await?;
        Ok(self.state.lock().await.records.clone())
    }

    async fn create(&self, fields: &Fields) -> ClientResult<Record> {
        self.begin(Call::Create(fields.clone())).await?;

        let mut state = self.state.lock().await;
        let id = state.next_id.to_string();
        state.next_id += 1;

        let record = Record::new(id, fields.clone());
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, fields: &Fields) -> ClientResult<Record> {
        self.begin(Call::Update(id.to_string(), fields.clone())).await?;

        let mut state = self.state.lock().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::not_found(id))?;

        for (key, value) in fields {
            if key != "id" {
                record.fields.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.begin(Call::Delete(id.to_string())).await?;

        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(ClientError::not_found(id));
        }
        Ok(())
    }
}

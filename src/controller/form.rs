use serde_json::Value;
use tracing::{error, info};

use crate::client::SharedClient;
use crate::models::{Fields, Record};
use crate::scope::ScreenScope;
use crate::store::{ChangeBus, ChangeEvent, ChangeKind};

pub const SAVE_FAILED_MESSAGE: &str = "Unable to save. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    fields: Fields,
}

impl Draft {
    pub fn from_record(record: &Record) -> Self {
        Self {
            fields: record.fields.clone(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name == "id" {
            return;
        }
        self.fields.insert(name, value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> String {
        match self.fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Record),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Record),
    /// User-facing alert text; details only go to the log.
    Failed(String),
    /// The screen was torn down before the server answered.
    Dropped,
}

pub struct FormController {
    client: SharedClient,
    mode: FormMode,
    draft: Draft,
    bus: ChangeBus,
    scope: ScreenScope,
}

impl FormController {
    pub fn create(client: SharedClient, bus: &ChangeBus, scope: ScreenScope) -> Self {
        Self {
            client,
            mode: FormMode::Create,
            draft: Draft::default(),
            bus: bus.clone(),
            scope,
        }
    }

    pub fn edit(client: SharedClient, record: Record, bus: &ChangeBus, scope: ScreenScope) -> Self {
        Self {
            client,
            draft: Draft::from_record(&record),
            mode: FormMode::Edit(record),
            bus: bus.clone(),
            scope,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.draft.set(name, value);
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        let fields = self.draft.fields();
        let (result, kind) = match &self.mode {
            FormMode::Edit(record) => (
                self.scope.run(self.client.update(&record.id, fields)).await,
                ChangeKind::Updated,
            ),
            FormMode::Create => (
                self.scope.run(self.client.create(fields)).await,
                ChangeKind::Created,
            ),
        };

        match result {
            Some(Ok(saved)) => {
                info!("saved {} {}", self.client.resource(), saved.id);
                self.bus.publish(ChangeEvent::new(
                    self.client.resource(),
                    kind,
                    saved.id.clone(),
                ));
                SubmitOutcome::Saved(saved)
            }
            Some(Err(e)) => {
                error!("Error saving {}: {}", self.client.resource(), e);
                SubmitOutcome::Failed(SAVE_FAILED_MESSAGE.to_string())
            }
            None => SubmitOutcome::Dropped,
        }
    }
}

use std::sync::Arc;

use crate::apps::{LaunchError, decode_all};
use crate::client::{ClientResult, HttpResourceClient, SharedClient};
use crate::config::{AppsConfig, ResourceConfig};
use crate::controller::{Confirm, FormController, ListController, SubmitOutcome};
use crate::models::Task;
use crate::navigation::NavStack;
use crate::store::ChangeBus;

pub const TITLE_FIELD: &str = "title";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScreen {
    Welcome,
    TaskList,
    TaskForm,
}

/// Welcome -> TaskList -> TaskForm.
pub struct TasksApp {
    client: SharedClient,
    bus: ChangeBus,
    nav: NavStack<TaskScreen>,
    name: String,
    list: Option<ListController>,
    form: Option<FormController>,
}

impl TasksApp {
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            bus: ChangeBus::default(),
            nav: NavStack::new(TaskScreen::Welcome),
            name: String::new(),
            list: None,
            form: None,
        }
    }

    pub fn from_config(config: &ResourceConfig) -> ClientResult<Self> {
        let client = HttpResourceClient::new(config.clone())?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn from_env() -> Result<Self, LaunchError> {
        let config = AppsConfig::load()?;
        Ok(Self::from_config(&config.tasks)?)
    }

    pub fn screen(&self) -> TaskScreen {
        *self.nav.current()
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn greeting(&self) -> String {
        format!("Hi {}", self.name)
    }

    pub async fn get_started(&mut self, name: impl Into<String>) {
        if self.screen() != TaskScreen::Welcome {
            return;
        }
        self.name = name.into();

        let scope = self.nav.push(TaskScreen::TaskList);
        let mut list = ListController::new(self.client.clone(), TITLE_FIELD, &self.bus, scope);
        list.refresh().await;
        self.list = Some(list);
    }

    pub fn list(&self) -> Option<&ListController> {
        self.list.as_ref()
    }

    pub fn search(&mut self, query: &str) {
        if let Some(list) = self.list.as_mut() {
            list.set_filter(query);
        }
    }

    /// Visible tasks after the search filter.
    pub fn tasks(&self) -> Vec<Task> {
        match &self.list {
            Some(list) => decode_all(list.visible()),
            None => Vec::new(),
        }
    }

    pub async fn delete_task(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        match self.list.as_mut() {
            Some(list) => list.request_delete(id, confirm).await,
            None => false,
        }
    }

    pub fn add_task(&mut self) -> bool {
        if self.screen() != TaskScreen::TaskList {
            return false;
        }
        let scope = self.nav.push(TaskScreen::TaskForm);
        self.form = Some(FormController::create(self.client.clone(), &self.bus, scope));
        true
    }

    pub fn edit_task(&mut self, id: &str) -> bool {
        if self.screen() != TaskScreen::TaskList {
            return false;
        }
        let Some(record) = self.list.as_ref().and_then(|l| l.find(id)).cloned() else {
            return false;
        };
        let scope = self.nav.push(TaskScreen::TaskForm);
        self.form = Some(FormController::edit(self.client.clone(), record, &self.bus, scope));
        true
    }

    pub fn form(&self) -> Option<&FormController> {
        self.form.as_ref()
    }

    pub fn form_title(&self) -> Option<&'static str> {
        self.form.as_ref().map(|form| {
            if form.is_editing() {
                "EDIT YOUR JOB"
            } else {
                "ADD YOUR JOB"
            }
        })
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(form) = self.form.as_mut() {
            form.set_field(TITLE_FIELD, title);
        }
    }

    /// Submits the form; on success returns to the list, which refetches.
    pub async fn finish(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.form.as_mut()?.submit().await;
        if let SubmitOutcome::Saved(_) = outcome {
            self.go_back().await;
        }
        Some(outcome)
    }

    pub async fn go_back(&mut self) {
        match self.nav.pop() {
            Some(TaskScreen::TaskForm) => {
                self.form = None;
                if let Some(list) = self.list.as_mut() {
                    list.sync().await;
                }
            }
            Some(TaskScreen::TaskList) => {
                self.list = None;
            }
            Some(TaskScreen::Welcome) | None => {}
        }
    }
}

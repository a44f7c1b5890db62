pub mod form;
pub mod list;

pub use form::{Draft, FormController, FormMode, SubmitOutcome};
pub use list::{Confirm, ListController, ListState, filter_records};

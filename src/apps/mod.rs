pub mod cafe;
pub mod food;
pub mod tasks;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::models::Record;

pub use cafe::{CafeApp, CafeScreen, DrinksController, OrderLine, OrderSheet, OrderSummary, SummaryKind};
pub use food::{CartOutcome, CatalogView, DetailController, FoodApp, FoodScreen};
pub use tasks::{TaskScreen, TasksApp};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// `$x.xx`
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Decodes each record, skipping (and logging) the ones that don't fit.
pub(crate) fn decode_all<'a, T, I>(records: I) -> Vec<T>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = &'a Record>,
{
    let mut models = Vec::new();
    for record in records {
        match record.clone().into_model::<T>() {
            Ok(model) => models.push(model),
            Err(e) => {
                warn!("Failed to parse record {}: {}", record.id, e);
            }
        }
    }
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fields, Task};
    use serde_json::json;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(20.5), "$20.50");
    }

    #[test]
    fn skips_records_that_do_not_decode() {
        let mut good = Fields::new();
        good.insert("title".into(), json!("Buy milk"));
        let mut bad = Fields::new();
        bad.insert("title".into(), json!(["not", "a", "string"]));

        let records = vec![Record::new("1", good), Record::new("2", bad)];
        let tasks: Vec<Task> = decode_all(&records);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "1");
    }
}

pub mod repository;

use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // every connection to :memory: opens its own database, so keep exactly one alive
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Loads `{ "<resource>": [ {...}, ... ] }` fixtures, in file order per
/// resource.
pub async fn seed(db: &SqlitePool, fixtures: Value) -> Result<usize, AppError> {
    let Value::Object(collections) = fixtures else {
        return Err(AppError::Seed("fixtures must be a JSON object".to_string()));
    };

    let mut inserted = 0;

    for (resource, records) in collections {
        let Value::Array(records) = records else {
            return Err(AppError::Seed(format!("{} must be an array", resource)));
        };
        for record in records {
            let fields = repository::fields_from_value(record)
                .map_err(|_| AppError::Seed(format!("{} entries must be objects", resource)))?;
            repository::insert_record(db, &resource, fields).await?;
            inserted += 1;
        }
        info!("seeded {}", resource);
    }

    Ok(inserted)
}

pub async fn seed_from_file(db: &SqlitePool, path: &Path) -> Result<usize, AppError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Seed(format!("Failed to read {}: {}", path.display(), e)))?;
    let fixtures: Value = serde_json::from_str(&text)
        .map_err(|e| AppError::Seed(format!("Failed to parse {}: {}", path.display(), e)))?;
    seed(db, fixtures).await
}

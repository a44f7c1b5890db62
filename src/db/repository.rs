use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::AppError;
use crate::models::{Fields, Record};

fn decode_body(id: String, body: &str) -> Result<Record, AppError> {
    let fields: Fields =
        serde_json::from_str(body).map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?;
    Ok(Record::new(id, fields))
}

fn encode_body(fields: &Fields) -> Result<String, AppError> {
    serde_json::to_string(fields)
        .map_err(|e| AppError::BadRequest(format!("Failed to encode record: {}", e)))
}

pub async fn fetch_records(db: &SqlitePool, resource: &str) -> Result<Vec<Record>, AppError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT id, body
        FROM records
        WHERE resource = ?1
        ORDER BY seq
        "#,
    )
    .bind(resource)
    .fetch_all(db)
    .await?;

    rows.into_iter()
        .map(|(id, body)| decode_body(id, &body))
        .collect()
}

pub async fn fetch_record(
    db: &SqlitePool,
    resource: &str,
    id: &str,
) -> Result<Option<Record>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT id, body FROM records WHERE resource = ?1 AND id = ?2",
    )
    .bind(resource)
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(|(id, body)| decode_body(id, &body)).transpose()
}

async fn next_id(tx: &mut Transaction<'_, Sqlite>, resource: &str) -> Result<i64, AppError> {
    let (next,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO resource_counters (resource, next_id) VALUES (?1, 1)
        ON CONFLICT(resource) DO UPDATE SET next_id = next_id + 1
        RETURNING next_id
        "#,
    )
    .bind(resource)
    .fetch_one(&mut **tx)
    .await?;
    Ok(next)
}

/// Stores `fields` under a fresh server-assigned id. Any `id` in the body is
/// ignored.
pub async fn insert_record(
    db: &SqlitePool,
    resource: &str,
    fields: Fields,
) -> Result<Record, AppError> {
    let mut tx = db.begin().await?;

    let id = next_id(&mut tx, resource).await?.to_string();
    let record = Record::new(id, fields);
    let body = encode_body(&record.fields)?;

    sqlx::query("INSERT INTO records (resource, id, body) VALUES (?1, ?2, ?3)")
        .bind(resource)
        .bind(&record.id)
        .bind(body)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(record)
}

/// Merges `fields` over the stored record.
pub async fn update_record(
    db: &SqlitePool,
    resource: &str,
    id: &str,
    fields: Fields,
) -> Result<Option<Record>, AppError> {
    let Some(mut record) = fetch_record(db, resource, id).await? else {
        return Ok(None);
    };

    for (key, value) in fields {
        if key != "id" {
            record.fields.insert(key, value);
        }
    }
    let body = encode_body(&record.fields)?;

    sqlx::query("UPDATE records SET body = ?3 WHERE resource = ?1 AND id = ?2")
        .bind(resource)
        .bind(id)
        .bind(body)
        .execute(db)
        .await?;

    Ok(Some(record))
}

pub async fn delete_record(
    db: &SqlitePool,
    resource: &str,
    id: &str,
) -> Result<Option<Record>, AppError> {
    let Some(record) = fetch_record(db, resource, id).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM records WHERE resource = ?1 AND id = ?2")
        .bind(resource)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(record))
}

/// Object bodies only; anything else is a bad request.
pub fn fields_from_value(value: Value) -> Result<Fields, AppError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest("body must be a JSON object".to_string())),
    }
}

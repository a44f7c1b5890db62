use axum::Json;
use axum::extract::Path;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde_json::Value;

use crate::db::repository;
use crate::error::AppError;
use crate::models::Record;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_records(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<Vec<Record>>, AppError> {
    let records = repository::fetch_records(&state.db, &resource).await?;
    Ok(Json(records))
}

async fn create_record(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let fields = repository::fields_from_value(body)?;
    let record = repository::insert_record(&state.db, &resource, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Record>, AppError> {
    let record = repository::fetch_record(&state.db, &resource, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn update_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Record>, AppError> {
    let fields = repository::fields_from_value(body)?;
    let record = repository::update_record(&state.db, &resource, &id, fields)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Record>, AppError> {
    let record = repository::delete_record(&state.db, &resource, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

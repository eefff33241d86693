use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::record::FlatRecord;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/records/:batch_id", get(records))
}

#[derive(Serialize)]
struct RecordsResponse {
    batch_id: String,
    user_id: String,
    file_count: usize,
    received_at: DateTime<Utc>,
    columns: [&'static str; 12],
    rows: Vec<[Value; 12]>,
}

async fn records(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> Result<Json<RecordsResponse>, AppError> {
    let batch = state
        .get(&batch_id)
        .ok_or_else(|| AppError::NotFound(batch_id.clone()))?;

    Ok(Json(RecordsResponse {
        batch_id,
        user_id: batch.user_id,
        file_count: batch.file_count,
        received_at: batch.received_at,
        columns: FlatRecord::COLUMNS,
        rows: batch.records.iter().map(FlatRecord::row).collect(),
    }))
}

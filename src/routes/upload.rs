use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::normalize::Normalizer;
use crate::state::{AppState, NormalizedBatch};
use crate::types::export::ExportFormat;
use crate::types::record::{FlatRecord, RecordCounts};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

#[derive(Serialize, Deserialize)]
struct UploadResponse {
    batch_id: String,
    user_id: String,
    file_count: usize,
    record_count: usize,
    #[serde(flatten)]
    counts: RecordCounts,
    columns: Vec<String>,
    received_at: DateTime<Utc>,
}

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut user_id: Option<String> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "user_id" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read user_id: {}", e))
                })?;
                user_id = Some(value.trim().to_string());
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?;
                files.push(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("No user_id provided".to_string()))?;
    if files.is_empty() {
        return Err(AppError::BadRequest("No file provided".to_string()));
    }

    if files
        .iter()
        .any(|file| ExportFormat::from_filename(&file.filename).is_none())
    {
        return Err(AppError::BadRequest("Unsupported file format".to_string()));
    }

    let mut normalizer = Normalizer::new();
    for file in &files {
        tracing::info!("Normalizing export file {} for user {}", file.filename, user_id);
        normalizer.process_bytes(&file.bytes, &user_id)?;
    }

    let records = normalizer.records();
    let counts = RecordCounts::tally(&records);
    let batch_id = Uuid::new_v4().to_string();
    let received_at = Utc::now();

    tracing::info!(
        "Stored batch {} for user {} ({} files, {} records)",
        batch_id,
        user_id,
        normalizer.file_count(),
        records.len()
    );

    let response = UploadResponse {
        batch_id: batch_id.clone(),
        user_id: user_id.clone(),
        file_count: normalizer.file_count(),
        record_count: records.len(),
        counts,
        columns: FlatRecord::COLUMNS.iter().map(|c| c.to_string()).collect(),
        received_at,
    };

    state.insert(
        batch_id,
        NormalizedBatch {
            user_id,
            file_count: normalizer.file_count(),
            records,
            received_at,
        },
    );

    Ok(Json(response))
}

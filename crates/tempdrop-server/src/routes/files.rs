use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::preview::{self, Preview};
use crate::state::AppState;
use crate::store::{self, Lookup};
use crate::types::{
    normalize_name, CleanupResponse, FileListEntry, FileListResponse, FileMetadata, StoredFile,
};

/// Resolve a path parameter to a live file, evicting it if it has expired
async fn live_file(state: &AppState, filename: &str) -> Result<StoredFile, AppError> {
    let name = normalize_name(filename);
    let lookup = state
        .within_deadline(store::find_live(state.store.as_ref(), &name, Utc::now()))
        .await?;

    match lookup {
        Lookup::Live(file) => Ok(file),
        Lookup::Expired => Err(AppError::NotFound("File has expired".into())),
        Lookup::Missing => Err(AppError::NotFound("File not found".into())),
    }
}

/// GET /api/retrieve/{filename}
pub async fn retrieve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<FileMetadata>, AppError> {
    let file = live_file(&state, &filename).await?;
    Ok(Json(FileMetadata::from(&file.info)))
}

/// GET /api/view/{filename}
pub async fn view(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Preview>, AppError> {
    let file = live_file(&state, &filename).await?;
    Ok(Json(preview::render(&file)))
}

/// GET /api/download/{filename}
/// Sends the raw payload as an attachment named after the original file.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let file = live_file(&state, &filename).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_name(&file.info.original_name)
    );
    let content_type = file.info.content_type;
    let content_length = file.payload.byte_len();
    let data = file.payload.into_bytes();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, content_length)
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

/// Quotes, backslashes and control characters cannot appear in a quoted
/// header filename
fn header_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_ascii_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// DELETE /api/cleanup
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, AppError> {
    let deleted = state
        .within_deadline(state.store.delete_expired_before(Utc::now()))
        .await?;
    info!(count = deleted, "On-demand cleanup");
    Ok(Json(CleanupResponse::deleted(deleted)))
}

/// GET /api/files
pub async fn list(State(state): State<AppState>) -> Result<Json<FileListResponse>, AppError> {
    let files = state
        .within_deadline(state.store.list_active(Utc::now()))
        .await?;
    Ok(Json(FileListResponse {
        files: files.iter().map(FileListEntry::from).collect(),
    }))
}

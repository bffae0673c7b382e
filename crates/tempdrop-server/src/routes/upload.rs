use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::info;

use crate::constants::FALLBACK_CONTENT_TYPE;
use crate::error::AppError;
use crate::expiry::Expiry;
use crate::state::AppState;
use crate::types::{NewFile, UploadResponse, UploadTextRequest};

/// Fields of the multipart upload form
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    expiry: Option<String>,
    upload_type: Option<String>,
    text_content: Option<String>,
    file: Option<FilePart>,
}

#[derive(Debug)]
struct FilePart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

/// POST /api/upload
///
/// Multipart form with `filename`, `expiry`, `uploadType` and either a
/// `file` part or, when `uploadType` is `text`, a `textContent` field.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_form(multipart).await?;

    let filename = non_empty(form.filename)
        .ok_or_else(|| AppError::BadRequest("Filename is required".into()))?;
    let expiry = Expiry::from_key(form.expiry.as_deref());
    let now = Utc::now();

    let file = if form.upload_type.as_deref() == Some("text") {
        let text = non_empty(form.text_content)
            .ok_or_else(|| AppError::BadRequest("Text content is required".into()))?;
        NewFile::text(&filename, text, expiry, now)
    } else {
        let part = form
            .file
            .ok_or_else(|| AppError::BadRequest("File is required".into()))?;
        let original_name = non_empty(part.file_name).unwrap_or_else(|| filename.clone());
        let content_type =
            non_empty(part.content_type).unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
        NewFile::binary(&filename, original_name, content_type, part.data, expiry, now)
    };

    save(&state, file).await
}

/// POST /api/upload-text
pub async fn upload_text(
    State(state): State<AppState>,
    body: Result<Json<UploadTextRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (filename, text) = match (non_empty(body.filename), non_empty(body.text_content)) {
        (Some(filename), Some(text)) => (filename, text),
        _ => {
            return Err(AppError::BadRequest(
                "Filename and text content are required".into(),
            ))
        }
    };

    let expiry = body
        .expiry
        .map(|key| key.to_expiry())
        .unwrap_or_default();

    save(&state, NewFile::text(&filename, text, expiry, Utc::now())).await
}

async fn save(state: &AppState, file: NewFile) -> Result<Json<UploadResponse>, AppError> {
    let kind = file.info.kind;
    let size = file.info.size;
    let display_name = file.info.original_name.clone();

    let stored = state.within_deadline(state.store.insert(file)).await?;
    info!(
        id = stored.id,
        kind = kind.as_str(),
        name = %display_name,
        size,
        expires_at = %stored.info.expires_at,
        "Saved upload"
    );

    Ok(Json(UploadResponse::stored(&display_name)))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();

                // Browsers send an empty, unnamed part when no file was picked
                let picked = !data.is_empty() || file_name.as_deref().is_some_and(|n| !n.is_empty());
                if picked {
                    form.file = Some(FilePart {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            "filename" => form.filename = Some(read_text(field).await?),
            "expiry" => form.expiry = Some(read_text(field).await?),
            "uploadType" => form.upload_type = Some(read_text(field).await?),
            "textContent" => form.text_content = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `upload_type` value for binary payloads stored in `file_data`
pub const UPLOAD_TYPE_FILE: &str = "file";

/// `upload_type` value for text payloads stored in `text_content`
pub const UPLOAD_TYPE_TEXT: &str = "text";

/// Full shared file row, payload included
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: i64,
    pub name: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub upload_type: String,
    pub file_data: Option<Vec<u8>>,
    pub text_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Shared file row without payload columns, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileMetadataRow {
    pub id: i64,
    pub name: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub upload_type: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Parameters for inserting a shared file
#[derive(Debug, Clone)]
pub struct InsertFileParams {
    pub name: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub upload_type: String,
    pub file_data: Option<Vec<u8>>,
    pub text_content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

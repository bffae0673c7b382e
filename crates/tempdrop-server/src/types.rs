//! Core types for shared files and the HTTP wire format

use crate::constants::{TEXT_CONTENT_TYPE, TEXT_FILE_SUFFIX};
use crate::expiry::{Expiry, ExpiryKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which payload a shared file carries. Serialized as the `uploadType`
/// values the browser client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FileKind {
    #[serde(rename = "file")]
    Binary,
    #[serde(rename = "text")]
    Text,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Binary => tempdrop_db::UPLOAD_TYPE_FILE,
            FileKind::Text => tempdrop_db::UPLOAD_TYPE_TEXT,
        }
    }
}

/// Stored content of a shared file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Binary(Vec<u8>),
    Text(String),
}

impl Payload {
    /// Number of bytes a download of this payload sends
    pub fn byte_len(&self) -> usize {
        match self {
            Payload::Binary(data) => data.len(),
            Payload::Text(text) => text.len(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Binary(data) => data,
            Payload::Text(text) => text.into_bytes(),
        }
    }
}

/// Everything known about a shared file except its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Lowercased lookup key
    pub name: String,
    /// Display name, also used as the download filename
    pub original_name: String,
    pub content_type: String,
    /// Byte length for binary files, character count for text
    pub size: u64,
    pub kind: FileKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl FileInfo {
    /// A file is gone once its expiry instant has been reached
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A file about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub info: FileInfo,
    pub payload: Payload,
}

impl NewFile {
    /// Build a text upload.
    ///
    /// The display name is always `<name>.txt`, so a name that already ends
    /// in `.txt` is stored as `<name>.txt.txt`.
    pub fn text(name: &str, text: String, expiry: Expiry, now: DateTime<Utc>) -> Self {
        Self {
            info: FileInfo {
                name: normalize_name(name),
                original_name: format!("{}{}", name, TEXT_FILE_SUFFIX),
                content_type: TEXT_CONTENT_TYPE.to_string(),
                size: text.chars().count() as u64,
                kind: FileKind::Text,
                created_at: now,
                expires_at: expiry.expires_at(now),
            },
            payload: Payload::Text(text),
        }
    }

    /// Build a binary upload
    pub fn binary(
        name: &str,
        original_name: String,
        content_type: String,
        data: Vec<u8>,
        expiry: Expiry,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            info: FileInfo {
                name: normalize_name(name),
                original_name,
                content_type,
                size: data.len() as u64,
                kind: FileKind::Binary,
                created_at: now,
                expires_at: expiry.expires_at(now),
            },
            payload: Payload::Binary(data),
        }
    }
}

/// A file as held by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Store-assigned id, distinct for every insert even when a name is reused
    pub id: i64,
    pub info: FileInfo,
    pub payload: Payload,
}

/// Lookup keys are case-insensitive
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

// --- Wire types ---

/// Health check response
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// JSON body of `POST /api/upload-text`
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UploadTextRequest {
    #[ts(optional)]
    pub filename: Option<String>,
    #[ts(optional)]
    pub text_content: Option<String>,
    #[ts(optional)]
    pub expiry: Option<ExpiryKey>,
}

/// Successful upload response
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Display name the file was stored under
    pub filename: String,
}

impl UploadResponse {
    pub fn stored(display_name: &str) -> Self {
        Self {
            success: true,
            message: format!("Uploaded {} successfully!", display_name),
            filename: display_name.to_string(),
        }
    }
}

/// File metadata, payload excluded
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FileMetadata {
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
    pub upload_type: FileKind,
    pub expires_at: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&FileInfo> for FileMetadata {
    fn from(info: &FileInfo) -> Self {
        Self {
            original_name: info.original_name.clone(),
            content_type: info.content_type.clone(),
            size: info.size,
            upload_type: info.kind,
            expires_at: info.expires_at,
            uploaded_at: info.created_at,
        }
    }
}

/// Listing entry: metadata plus the lookup name
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FileListEntry {
    pub filename: String,
    #[serde(flatten)]
    pub metadata: FileMetadata,
}

impl From<&FileInfo> for FileListEntry {
    fn from(info: &FileInfo) -> Self {
        Self {
            filename: info.name.clone(),
            metadata: FileMetadata::from(info),
        }
    }
}

/// Response of `GET /api/files`
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FileListResponse {
    pub files: Vec<FileListEntry>,
}

/// Response of `DELETE /api/cleanup`
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CleanupResponse {
    pub message: String,
}

impl CleanupResponse {
    pub fn deleted(count: u64) -> Self {
        Self {
            message: format!("Cleaned up {} expired files", count),
        }
    }
}

//! Postgres-backed file store

use super::{FileStore, StoreError, StoreResult};
use crate::types::{FileInfo, FileKind, NewFile, Payload, StoredFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tempdrop_db::{FileMetadataRow, FileRow, InsertFileParams};
use tracing::{debug, info};

/// File store over a Postgres connection pool
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Connect to the database
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> StoreResult<Self> {
        info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;
        info!("Database connection established");
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        tempdrop_db::migrate::migrate(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }
}

fn parse_kind(upload_type: &str, id: i64) -> StoreResult<FileKind> {
    match upload_type {
        tempdrop_db::UPLOAD_TYPE_FILE => Ok(FileKind::Binary),
        tempdrop_db::UPLOAD_TYPE_TEXT => Ok(FileKind::Text),
        other => Err(StoreError::InvalidRecord(format!(
            "row {} has unknown upload_type {:?}",
            id, other
        ))),
    }
}

fn size_from_row(size_bytes: i64, id: i64) -> StoreResult<u64> {
    u64::try_from(size_bytes)
        .map_err(|_| StoreError::InvalidRecord(format!("row {} has negative size", id)))
}

impl TryFrom<FileRow> for StoredFile {
    type Error = StoreError;

    fn try_from(row: FileRow) -> StoreResult<Self> {
        let kind = parse_kind(&row.upload_type, row.id)?;
        let payload = match (kind, row.file_data, row.text_content) {
            (FileKind::Binary, Some(data), None) => Payload::Binary(data),
            (FileKind::Text, None, Some(text)) => Payload::Text(text),
            _ => {
                return Err(StoreError::InvalidRecord(format!(
                    "row {} payload does not match upload_type {}",
                    row.id, row.upload_type
                )))
            }
        };

        Ok(StoredFile {
            id: row.id,
            info: FileInfo {
                name: row.name,
                original_name: row.original_name,
                content_type: row.content_type,
                size: size_from_row(row.size_bytes, row.id)?,
                kind,
                created_at: row.created_at,
                expires_at: row.expires_at,
            },
            payload,
        })
    }
}

impl TryFrom<FileMetadataRow> for FileInfo {
    type Error = StoreError;

    fn try_from(row: FileMetadataRow) -> StoreResult<Self> {
        Ok(FileInfo {
            kind: parse_kind(&row.upload_type, row.id)?,
            size: size_from_row(row.size_bytes, row.id)?,
            name: row.name,
            original_name: row.original_name,
            content_type: row.content_type,
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}

fn insert_params(file: &NewFile) -> InsertFileParams {
    let (file_data, text_content) = match &file.payload {
        Payload::Binary(data) => (Some(data.clone()), None),
        Payload::Text(text) => (None, Some(text.clone())),
    };

    InsertFileParams {
        name: file.info.name.clone(),
        original_name: file.info.original_name.clone(),
        content_type: file.info.content_type.clone(),
        size_bytes: file.info.size as i64,
        upload_type: file.info.kind.as_str().to_string(),
        file_data,
        text_content,
        created_at: file.info.created_at,
        expires_at: file.info.expires_at,
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn insert(&self, file: NewFile) -> StoreResult<StoredFile> {
        let live = tempdrop_db::files::find_live_id(&self.pool, &file.info.name, file.info.created_at)
            .await?;
        if live.is_some() {
            return Err(StoreError::Conflict(file.info.name));
        }

        let id = tempdrop_db::files::insert(&self.pool, &insert_params(&file)).await?;
        debug!(id, name = %file.info.name, "Inserted shared file");

        Ok(StoredFile {
            id,
            info: file.info,
            payload: file.payload,
        })
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<StoredFile>> {
        tempdrop_db::files::get_by_name(&self.pool, name)
            .await?
            .map(StoredFile::try_from)
            .transpose()
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(tempdrop_db::files::delete_by_id(&self.pool, id).await?)
    }

    async fn delete_expired_before(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        Ok(tempdrop_db::files::delete_expired_before(&self.pool, now).await?)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> StoreResult<Vec<FileInfo>> {
        tempdrop_db::files::list_active(&self.pool, now)
            .await?
            .into_iter()
            .map(FileInfo::try_from)
            .collect()
    }

    async fn close(&self) {
        info!("Closing database connections...");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::Expiry;

    fn file_row(upload_type: &str, file_data: Option<Vec<u8>>, text: Option<&str>) -> FileRow {
        let now = Utc::now();
        FileRow {
            id: 7,
            name: "sample".to_string(),
            original_name: "sample.bin".to_string(),
            content_type: "application/octet-stream".to_string(),
            size_bytes: 3,
            upload_type: upload_type.to_string(),
            file_data,
            text_content: text.map(str::to_string),
            created_at: now,
            expires_at: now + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn test_binary_row_converts() {
        let file = StoredFile::try_from(file_row("file", Some(vec![1, 2, 3]), None)).unwrap();
        assert_eq!(file.id, 7);
        assert_eq!(file.info.kind, FileKind::Binary);
        assert_eq!(file.payload, Payload::Binary(vec![1, 2, 3]));
    }

    #[test]
    fn test_text_row_converts() {
        let file = StoredFile::try_from(file_row("text", None, Some("abc"))).unwrap();
        assert_eq!(file.info.kind, FileKind::Text);
        assert_eq!(file.payload, Payload::Text("abc".to_string()));
    }

    #[test]
    fn test_row_with_mismatched_payload_is_rejected() {
        let err = StoredFile::try_from(file_row("text", Some(vec![1]), None)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));

        let err = StoredFile::try_from(file_row("file", Some(vec![1]), Some("x"))).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn test_row_with_unknown_kind_is_rejected() {
        let err = StoredFile::try_from(file_row("video", Some(vec![1]), None)).unwrap_err();
        assert!(format!("{}", err).contains("unknown upload_type"));
    }

    #[test]
    fn test_insert_params_split_payload() {
        let now = Utc::now();
        let text = NewFile::text("Notes", "hello".to_string(), Expiry::OneHour, now);
        let params = insert_params(&text);
        assert_eq!(params.name, "notes");
        assert_eq!(params.upload_type, "text");
        assert_eq!(params.text_content.as_deref(), Some("hello"));
        assert!(params.file_data.is_none());

        let binary = NewFile::binary(
            "blob",
            "blob.bin".to_string(),
            "application/octet-stream".to_string(),
            vec![9, 9],
            Expiry::OneHour,
            now,
        );
        let params = insert_params(&binary);
        assert_eq!(params.upload_type, "file");
        assert_eq!(params.file_data, Some(vec![9, 9]));
        assert!(params.text_content.is_none());
        assert_eq!(params.size_bytes, 2);
    }
}

//! Shared file storage
//!
//! Handlers talk to a [`FileStore`] trait object so the Postgres backend and
//! the in-memory backend are interchangeable.

mod memory;
mod postgres;

pub use memory::MemoryFileStore;
pub use postgres::PgFileStore;

use crate::types::{FileInfo, NewFile, StoredFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum StoreError {
    /// A live file already holds the requested name
    Conflict(String),
    Database(Box<sqlx::Error>),
    /// A stored row violates the one-payload-per-kind invariant
    InvalidRecord(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict(name) => write!(f, "Name already in use: {}", name),
            StoreError::Database(err) => write!(f, "Database error: {}", err),
            StoreError::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(Box::new(err))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent collection of shared files keyed by lowercased name
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store a file, failing with [`StoreError::Conflict`] if a file that is
    /// still live at `file.info.created_at` holds the same name.
    ///
    /// The check and the write are not atomic; two racing inserts of the
    /// same name may both succeed and the later write wins.
    async fn insert(&self, file: NewFile) -> StoreResult<StoredFile>;

    /// Get a file by name, whether or not it has expired
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<StoredFile>>;

    /// Delete one file by id. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: i64) -> StoreResult<bool>;

    /// Delete every file with `expires_at < now`, returning the count
    async fn delete_expired_before(&self, now: DateTime<Utc>) -> StoreResult<u64>;

    /// Metadata of files live at `now`, newest first
    async fn list_active(&self, now: DateTime<Utc>) -> StoreResult<Vec<FileInfo>>;

    /// Release backend resources
    async fn close(&self);
}

/// Outcome of looking up a file by name
#[derive(Debug)]
pub enum Lookup {
    Live(StoredFile),
    /// The file had expired and has now been evicted
    Expired,
    Missing,
}

/// Look up a live file, evicting it if it has expired.
///
/// Eviction targets the stale file's id, so a newer upload that reused the
/// name in the meantime is left alone.
pub async fn find_live(store: &dyn FileStore, name: &str, now: DateTime<Utc>) -> StoreResult<Lookup> {
    let file = match store.find_by_name(name).await? {
        Some(file) => file,
        None => return Ok(Lookup::Missing),
    };

    if !file.info.is_expired_at(now) {
        return Ok(Lookup::Live(file));
    }

    debug!(name = %name, id = file.id, expires_at = %file.info.expires_at, "Evicting expired file");
    if let Err(e) = store.delete_by_id(file.id).await {
        warn!(name = %name, id = file.id, error = %e, "Failed to evict expired file");
    }
    Ok(Lookup::Expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::Expiry;
    use chrono::Duration;

    #[test]
    fn test_conflict_error_display() {
        let err = StoreError::Conflict("notes".to_string());
        assert_eq!(format!("{}", err), "Name already in use: notes");
    }

    #[test]
    fn test_invalid_record_error_display() {
        let err = StoreError::InvalidRecord("file row 7 has no file_data".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid record: file row 7 has no file_data"
        );
    }

    #[test]
    fn test_database_error_has_source() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(format!("{}", err).starts_with("Database error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_find_live_returns_live_file() {
        let store = MemoryFileStore::new();
        let now = Utc::now();
        store
            .insert(NewFile::text("notes", "hi".to_string(), Expiry::OneHour, now))
            .await
            .unwrap();

        match find_live(&store, "notes", now).await.unwrap() {
            Lookup::Live(file) => assert_eq!(file.info.original_name, "notes.txt"),
            other => panic!("expected live file, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_live_missing() {
        let store = MemoryFileStore::new();
        let lookup = find_live(&store, "nothing", Utc::now()).await.unwrap();
        assert!(matches!(lookup, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_find_live_evicts_expired_file() {
        let store = MemoryFileStore::new();
        let created = Utc::now() - Duration::hours(2);
        store
            .insert(NewFile::text("old", "stale".to_string(), Expiry::OneHour, created))
            .await
            .unwrap();

        let now = Utc::now();
        let lookup = find_live(&store, "old", now).await.unwrap();
        assert!(matches!(lookup, Lookup::Expired));

        // Evicted, not just hidden
        assert!(store.find_by_name("old").await.unwrap().is_none());
        let lookup = find_live(&store, "old", now).await.unwrap();
        assert!(matches!(lookup, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_find_live_treats_expiry_instant_as_expired() {
        let store = MemoryFileStore::new();
        let created = Utc::now();
        let file = store
            .insert(NewFile::text("edge", "x".to_string(), Expiry::TenMinutes, created))
            .await
            .unwrap();

        let lookup = find_live(&store, "edge", file.info.expires_at).await.unwrap();
        assert!(matches!(lookup, Lookup::Expired));
    }
}

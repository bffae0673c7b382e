//! Process-local file store for development and tests

use super::{FileStore, StoreError, StoreResult};
use crate::types::{FileInfo, NewFile, StoredFile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory store. Contents are lost when the process exits.
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, StoredFile>>,
    next_id: AtomicI64,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn insert(&self, file: NewFile) -> StoreResult<StoredFile> {
        let mut files = self.files.write().await;

        if let Some(existing) = files.get(&file.info.name) {
            if !existing.info.is_expired_at(file.info.created_at) {
                return Err(StoreError::Conflict(file.info.name));
            }
        }

        let stored = StoredFile {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            info: file.info,
            payload: file.payload,
        };
        files.insert(stored.info.name.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<StoredFile>> {
        Ok(self.files.read().await.get(name).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        let mut files = self.files.write().await;
        let name = files
            .iter()
            .find(|(_, f)| f.id == id)
            .map(|(name, _)| name.clone());

        Ok(match name {
            Some(name) => files.remove(&name).is_some(),
            None => false,
        })
    }

    async fn delete_expired_before(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|_, f| f.info.expires_at >= now);
        Ok((before - files.len()) as u64)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> StoreResult<Vec<FileInfo>> {
        let files = self.files.read().await;
        let mut active: Vec<FileInfo> = files
            .values()
            .filter(|f| !f.info.is_expired_at(now))
            .map(|f| f.info.clone())
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn close(&self) {
        let mut files = self.files.write().await;
        debug!(entries = files.len(), "Dropping in-memory files");
        files.clear();
    }
}

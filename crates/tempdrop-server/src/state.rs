use crate::config::Config;
use crate::error::AppError;
use crate::store::{FileStore, StoreResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FileStore>,
    /// Deadline for each store call made while serving a request
    pub request_timeout: Duration,
    pub max_file_upload_bytes: usize,
    pub max_text_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn FileStore>, config: &Config) -> Self {
        Self {
            store,
            request_timeout: config.request_timeout,
            max_file_upload_bytes: config.max_file_upload_bytes,
            max_text_upload_bytes: config.max_text_upload_bytes,
        }
    }

    /// Run a store call under the request deadline
    pub async fn within_deadline<T, F>(&self, call: F) -> Result<T, AppError>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout),
        }
    }
}

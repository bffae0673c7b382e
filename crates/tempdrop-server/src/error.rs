//! Error types for the tempdrop server

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Startup and lifecycle failures
#[derive(Debug)]
pub enum ServerError {
    Store(StoreError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Store(err) => write!(f, "Store error: {}", err),
            ServerError::Io(err) => write!(f, "IO error: {}", err),
            ServerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Store(err) => Some(err),
            ServerError::Io(err) => Some(err.as_ref()),
            ServerError::Config(_) => None,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        ServerError::Store(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServerError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Request error that converts to an HTTP response with a JSON `error` body
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// A store call outlived the request deadline
    Timeout,
    Internal(String),
    Store(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Timeout => {
                tracing::error!("Store call exceeded request deadline");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => AppError::Conflict("Filename already exists".into()),
            other => AppError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_config_error_display() {
        let err = ServerError::Config("invalid PORT".to_string());
        assert_eq!(format!("{}", err), "Configuration error: invalid PORT");
    }

    #[test]
    fn test_store_error_display() {
        let err = ServerError::from(StoreError::Conflict("notes".to_string()));
        assert_eq!(format!("{}", err), "Store error: Name already in use: notes");
    }

    #[test]
    fn test_error_is_debug() {
        let err = ServerError::Config("test".to_string());
        assert!(format!("{:?}", err).contains("Config"));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = response_parts(AppError::BadRequest("Filename is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Filename is required");

        let (status, _) = response_parts(AppError::NotFound("File not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = response_parts(AppError::Conflict("taken".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = response_parts(AppError::Timeout).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_conflict_becomes_409() {
        let err = AppError::from(StoreError::Conflict("notes".to_string()));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Filename already exists");
    }

    #[tokio::test]
    async fn test_store_failure_hides_details() {
        let err = AppError::from(StoreError::InvalidRecord("row 3 is broken".to_string()));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}

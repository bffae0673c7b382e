use crate::constants::{
    DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_MAX_FILE_UPLOAD_BYTES, DEFAULT_MAX_TEXT_UPLOAD_BYTES,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SWEEP_INTERVAL_SECS,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub request_timeout: Duration,
    pub sweep_interval: Duration,
    pub max_file_upload_bytes: usize,
    pub max_text_upload_bytes: usize,
    /// Static frontend served for non-API paths
    pub public_path: Option<PathBuf>,
    /// Allowed origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_file_upload_bytes: DEFAULT_MAX_FILE_UPLOAD_BYTES,
            max_text_upload_bytes: DEFAULT_MAX_TEXT_UPLOAD_BYTES,
            public_path: None,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());

        let port = get("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let db_max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.db_max_connections);

        let request_timeout = parsed("REQUEST_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);

        let sweep_interval = parsed("SWEEP_INTERVAL_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.sweep_interval);

        let max_file_upload_bytes = parsed("MAX_FILE_UPLOAD_BYTES")
            .map(|v| v as usize)
            .unwrap_or(defaults.max_file_upload_bytes);

        let max_text_upload_bytes = parsed("MAX_TEXT_UPLOAD_BYTES")
            .map(|v| v as usize)
            .unwrap_or(defaults.max_text_upload_bytes);

        let public_path = get("PUBLIC_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let cors_origins = get("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty() && o != "*")
                    .collect()
            })
            .unwrap_or_default();

        Self {
            port,
            database_url: database_url(&get),
            db_max_connections,
            request_timeout,
            sweep_interval,
            max_file_upload_bytes,
            max_text_upload_bytes,
            public_path,
            cors_origins,
        }
    }
}

/// `DATABASE_URL`, or a URL assembled from `DB_*` variables when only
/// `DB_HOST` is set (Cloud SQL style).
fn database_url(get: &impl Fn(&str) -> Option<String>) -> Option<String> {
    if let Some(url) = get("DATABASE_URL").filter(|u| !u.is_empty()) {
        return Some(url);
    }

    let host = get("DB_HOST")?;
    let name = get("DB_NAME").unwrap_or_else(|| "tempdrop".to_string());
    let user = get("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = get("DB_PASSWORD").unwrap_or_default();

    if host.starts_with("/cloudsql/") {
        // Unix socket connection
        Some(format!(
            "postgresql://{}:{}@localhost/{}?host={}",
            user, password, name, host
        ))
    } else {
        let port = get("DB_PORT").unwrap_or_else(|| "5432".to_string());
        Some(format!(
            "postgresql://{}:{}@{}:{}/{}",
            user, password, host, port, name
        ))
    }
}

// --- Server defaults ---

/// Port the HTTP server binds when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Default pool size for the Postgres store.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Deadline (in milliseconds) for each store call made while serving a request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Seconds between background sweeps of expired files.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

// --- Upload limits ---

/// Maximum multipart body accepted by the file upload endpoint.
pub const DEFAULT_MAX_FILE_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Maximum JSON body accepted by the text upload endpoint.
pub const DEFAULT_MAX_TEXT_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

// --- Content types ---

/// Content type recorded for text uploads.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Content type recorded for file parts that declare none.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Suffix appended to the supplied name of every text upload.
pub const TEXT_FILE_SUFFIX: &str = ".txt";

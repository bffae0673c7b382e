//! Tempdrop server library
//!
//! Short-lived file and text sharing over HTTP. Uploads are stored under a
//! case-insensitive name with a fixed time-to-live and purged once expired.

pub mod config;
pub mod constants;
pub mod error;
pub mod expiry;
pub mod preview;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod sweep;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result, ServerError};
pub use server::{create_app, create_router, shutdown_signal, start_server};
pub use state::AppState;
pub use store::{FileStore, MemoryFileStore, PgFileStore, StoreError};

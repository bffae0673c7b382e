//! HTTP server wiring
//!
//! Provides the `/api/*` routes, CORS, request tracing, the optional static
//! frontend and graceful shutdown.

use crate::config::Config;
use crate::routes;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use std::future::Future;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let file_limit = state.max_file_upload_bytes;
    let text_limit = state.max_text_upload_bytes;

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/upload",
            post(routes::upload::upload_file).layer(DefaultBodyLimit::max(file_limit)),
        )
        .route(
            "/api/upload-text",
            post(routes::upload::upload_text).layer(DefaultBodyLimit::max(text_limit)),
        )
        .route("/api/retrieve/{filename}", get(routes::files::retrieve))
        .route("/api/download/{filename}", get(routes::files::download))
        .route("/api/view/{filename}", get(routes::files::view))
        .route("/api/cleanup", delete(routes::files::cleanup))
        .route("/api/files", get(routes::files::list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the full application: API routes, CORS and the static frontend
pub fn create_app(state: AppState, config: &Config) -> Router {
    let app = create_router(state).layer(cors_layer(&config.cors_origins));

    match &config.public_path {
        Some(public_path) => {
            info!(public_path = %public_path.display(), "Serving static files");
            let index = ServeFile::new(public_path.join("index.html"));
            app.fallback_service(ServeDir::new(public_path).fallback(index))
        }
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn start_server<F>(app: Router, port: u16, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);
    info!("File sharing API ready at http://localhost:{}/api", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

use axum::Json;

use crate::types::HealthResponse;

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "File sharing backend is running".to_string(),
    })
}

use axum::Json;
use serde_json::{json, Value};

/// GET / and GET /api/health
/// Liveness check plus service metadata.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

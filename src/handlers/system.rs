use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::services::SchemeService;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Scheme API",
        "version": version,
        "description": "Government scheme records over a document store",
        "endpoints": {
            "list": "GET /schemes",
            "create": "POST /schemes",
            "update": "PUT|PATCH /schemes",
            "search": "GET /schemes/search/:name",
            "show": "GET /schemes/:id",
            "delete": "DELETE /schemes/:id",
            "delete_by_name": "DELETE /schemes/name/:name",
            "delete_by_names": "POST /schemes/delete-by-names, DELETE /schemes/by-names",
            "bulk_delete": "POST /schemes/bulk-delete",
            "health": "GET /health",
        }
    }))
}

/// GET /health - Liveness plus storage connectivity
pub async fn health(State(service): State<SchemeService>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match service.store().ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "storage": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "message": "storage unavailable"
                })),
            )
        }
    }
}

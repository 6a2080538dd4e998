use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::system;
use crate::services::SchemeService;

/// Build the full HTTP application around an already-wired service.
pub fn app(service: SchemeService, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(scheme_routes())
        .with_state(service)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn scheme_routes() -> Router<SchemeService> {
    use axum::routing::{delete, post};
    use crate::handlers::schemes;

    Router::new()
        // Collection-level operations
        .route(
            "/schemes",
            get(schemes::collection_get)
                .post(schemes::collection_post)
                .put(schemes::collection_put)
                .patch(schemes::collection_put),
        )
        .route("/schemes/search/:name", get(schemes::search_get))
        // Name-based and bulk deletes
        .route("/schemes/name/:name", delete(schemes::delete_by_name))
        .route("/schemes/delete-by-names", post(schemes::delete_by_names))
        .route("/schemes/by-names", delete(schemes::delete_by_names))
        .route("/schemes/bulk-delete", post(schemes::bulk_delete))
        // Record-level operations
        .route(
            "/schemes/:id",
            get(schemes::record_get).delete(schemes::record_delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

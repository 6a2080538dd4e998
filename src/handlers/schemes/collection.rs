use axum::extract::State;

use crate::database::models::Scheme;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::SchemeService;
use crate::types::{CreatedSchemesResponse, NewSchemeRequest, OneOrMany, UpdateSchemeRequest};

/// GET /schemes - List every scheme
pub async fn get(State(service): State<SchemeService>) -> ApiResult<Vec<Scheme>> {
    let schemes = service.list_all().await?;
    Ok(ApiResponse::success(schemes))
}

/// POST /schemes - Create a batch of schemes
pub async fn post(
    State(service): State<SchemeService>,
    JsonBody(payload): JsonBody<Vec<NewSchemeRequest>>,
) -> ApiResult<CreatedSchemesResponse> {
    let created = service.create_many(payload).await?;

    Ok(ApiResponse::created(CreatedSchemesResponse {
        message: "Schemes Added successfully!".to_string(),
        data: created,
    }))
}

/// PUT|PATCH /schemes - Update one scheme or an array of schemes by id.
/// Ids that match nothing are returned as `null`.
pub async fn put(
    State(service): State<SchemeService>,
    JsonBody(payload): JsonBody<OneOrMany<UpdateSchemeRequest>>,
) -> ApiResult<Vec<Option<Scheme>>> {
    let updated = service.update_many(payload.into_vec()).await?;
    Ok(ApiResponse::success(updated))
}

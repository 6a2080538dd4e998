use axum::extract::{Path, State};

use crate::database::models::Scheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SchemeService;
use crate::types::MessageResponse;

/// GET /schemes/:id - Get a single scheme by id
pub async fn get(
    State(service): State<SchemeService>,
    Path(id): Path<String>,
) -> ApiResult<Scheme> {
    let scheme = service.get_by_id(&id).await?;
    Ok(ApiResponse::success(scheme))
}

/// DELETE /schemes/:id - Permanently delete a scheme by id
pub async fn delete(
    State(service): State<SchemeService>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    service.delete_by_id(&id).await?;
    Ok(ApiResponse::success(MessageResponse::new("Scheme deleted successfully.")))
}

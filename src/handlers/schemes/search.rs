use axum::extract::{Path, State};

use crate::database::models::Scheme;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SchemeService;

/// GET /schemes/search/:name - Case-insensitive substring search on the name
pub async fn get(
    State(service): State<SchemeService>,
    Path(name): Path<String>,
) -> ApiResult<Vec<Scheme>> {
    let schemes = service.search_by_name(&name).await?;
    Ok(ApiResponse::success(schemes))
}

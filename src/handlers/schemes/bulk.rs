use axum::extract::{Path, State};

use crate::database::models::DeleteSummary;
use crate::error::{ApiError, INTERNAL_SERVER_ERROR};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::{SchemeError, SchemeService};
use crate::types::{BulkDeleteRequest, BulkDeleteResponse, DeleteByNamesRequest, MessageResponse};

/// DELETE /schemes/name/:name - Delete one scheme whose name matches exactly
pub async fn delete_by_name(
    State(service): State<SchemeService>,
    Path(name): Path<String>,
) -> ApiResult<MessageResponse> {
    service.delete_by_name(&name).await?;
    Ok(ApiResponse::success(MessageResponse::new("Scheme deleted successfully.")))
}

/// POST /schemes/delete-by-names - Delete every scheme named in `schemeNames`
pub async fn delete_by_names(
    State(service): State<SchemeService>,
    JsonBody(payload): JsonBody<DeleteByNamesRequest>,
) -> ApiResult<DeleteSummary> {
    let summary = service.delete_by_names(payload).await?;
    Ok(ApiResponse::success(summary))
}

/// POST /schemes/bulk-delete - Delete every scheme whose id is in `identifiers`
pub async fn bulk_delete(
    State(service): State<SchemeService>,
    JsonBody(payload): JsonBody<BulkDeleteRequest>,
) -> ApiResult<BulkDeleteResponse> {
    let summary = service.bulk_delete(payload).await.map_err(|err| match err {
        SchemeError::Database(db_err) => {
            tracing::error!("Bulk delete failed: {}", db_err);
            ApiError::internal_with_detail(INTERNAL_SERVER_ERROR, db_err.to_string())
        }
        other => ApiError::from(other),
    })?;

    Ok(ApiResponse::success(BulkDeleteResponse {
        message: "Bulk delete successful".to_string(),
        deleted_schemes: summary,
    }))
}

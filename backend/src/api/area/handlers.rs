//! Handler functions for area-of-interest API endpoints.

use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

use crate::api::common::{PagedRequest, PagedResponse, service_error_to_http};
use crate::database::models::{AreaOfInterest, CreateAreaOfInterest};
use crate::services::area_service::AreaOfInterestService;

/// Creates a new area of interest (admin only).
#[axum::debug_handler]
pub async fn create_area(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateAreaOfInterest>,
) -> Result<ResponseJson<AreaOfInterest>, (StatusCode, String)> {
    match AreaOfInterestService::new(&pool).create_area(payload).await {
        Ok(area) => Ok(ResponseJson(area)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists areas of interest as a page envelope.
#[axum::debug_handler]
pub async fn list_areas(
    Extension(pool): Extension<SqlitePool>,
    Query(request): Query<PagedRequest>,
) -> Result<ResponseJson<PagedResponse<AreaOfInterest>>, (StatusCode, String)> {
    match AreaOfInterestService::new(&pool).list_areas(&request).await {
        Ok(page) => Ok(ResponseJson(page)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

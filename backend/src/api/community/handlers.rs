//! Handler functions for community-member API endpoints.

use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

use crate::api::common::{PagedRequest, PagedResponse, service_error_to_http};
use crate::database::models::{CommunityMember, CreateCommunityMember};
use crate::services::community_service::CommunityService;

/// Registers a community member through the public form.
#[axum::debug_handler]
pub async fn create_member(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateCommunityMember>,
) -> Result<ResponseJson<CommunityMember>, (StatusCode, String)> {
    match CommunityService::new(&pool).create_member(payload).await {
        Ok(member) => Ok(ResponseJson(member)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists community members as a page envelope.
#[axum::debug_handler]
pub async fn list_members(
    Extension(pool): Extension<SqlitePool>,
    Query(request): Query<PagedRequest>,
) -> Result<ResponseJson<PagedResponse<CommunityMember>>, (StatusCode, String)> {
    match CommunityService::new(&pool).list_members(&request).await {
        Ok(page) => Ok(ResponseJson(page)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

//! Handler functions for volunteer-application API endpoints.

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

use crate::api::common::{PagedRequest, PagedResponse, service_error_to_http};
use crate::database::models::{CreateVolunteerApplication, VolunteerApplication};
use crate::services::volunteer_service::VolunteerApplicationService;

/// Submits a volunteer application through the public form.
#[axum::debug_handler]
pub async fn create_application(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateVolunteerApplication>,
) -> Result<ResponseJson<VolunteerApplication>, (StatusCode, String)> {
    match VolunteerApplicationService::new(&pool)
        .create_application(payload)
        .await
    {
        Ok(application) => Ok(ResponseJson(application)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Lists volunteer applications as a page envelope; `search` matches full
/// name, email and city.
#[axum::debug_handler]
pub async fn list_applications(
    Extension(pool): Extension<SqlitePool>,
    Query(request): Query<PagedRequest>,
) -> Result<ResponseJson<PagedResponse<VolunteerApplication>>, (StatusCode, String)> {
    match VolunteerApplicationService::new(&pool)
        .list_applications(&request)
        .await
    {
        Ok(page) => Ok(ResponseJson(page)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Looks up a single application by applicant email.
#[axum::debug_handler]
pub async fn get_application_by_email(
    Extension(pool): Extension<SqlitePool>,
    Path(email): Path<String>,
) -> Result<ResponseJson<VolunteerApplication>, (StatusCode, String)> {
    match VolunteerApplicationService::new(&pool)
        .get_by_email(&email)
        .await
    {
        Ok(Some(application)) => Ok(ResponseJson(application)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            "Volunteer application not found".to_string(),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! token refresh/revocation, logout and password changes, then delegate to
//! the `auth::service` for the actual protocol.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::repositories::account_repository::SqliteAccountStore;
use crate::utils::jwt::{Claims, TokenIssuer};

fn auth_service(pool: SqlitePool, issuer: &TokenIssuer) -> AuthService<SqliteAccountStore> {
    AuthService::new(SqliteAccountStore::new(pool), issuer.clone())
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match auth_service(pool, &issuer).register(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match auth_service(pool, &issuer).login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match auth_service(pool, &issuer).refresh_token(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle explicit refresh-token revocation
#[axum::debug_handler]
pub async fn revoke_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<RevokeTokenResponse>, (StatusCode, String)> {
    match auth_service(pool, &issuer).revoke_token(payload).await {
        Ok(revoked) => Ok(ResponseJson(RevokeTokenResponse { revoked })),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout: revokes every active session of the caller
#[axum::debug_handler]
pub async fn logout(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    match auth_service(pool, &issuer).logout(claims.user_id()).await {
        Ok(()) => Ok(ResponseJson(serde_json::json!({
            "message": "Logged out successfully"
        }))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle password change for the authenticated user
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    match auth_service(pool, &issuer)
        .change_password(claims.user_id(), payload)
        .await
    {
        Ok(()) => Ok(ResponseJson(serde_json::json!({
            "message": "Password changed successfully"
        }))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from the verified token
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(issuer): Extension<Arc<TokenIssuer>>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<UserInfo>, (StatusCode, String)> {
    match auth_service(pool, &issuer).get_profile(claims.user_id()).await {
        Ok(Some(user)) => Ok(ResponseJson(user)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "User not found".to_string())),
        Err(error) => Err(service_error_to_http(error)),
    }
}

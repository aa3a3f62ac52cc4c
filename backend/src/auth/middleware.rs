//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Validates bearer tokens with the process-wide token issuer and stores the
//! verified claims in request extensions for handlers to use.

use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::utils::jwt::{Claims, TokenIssuer};

/// JWT authentication middleware
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // The issuer is installed as a router-wide extension at startup.
    let issuer = request
        .extensions()
        .get::<Arc<TokenIssuer>>()
        .cloned()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    match issuer.validate_principal(token, false) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => {
            // Unverified read, for the log only.
            if let Some(subject) = TokenIssuer::extract_user_id(token) {
                tracing::debug!("Rejected access token for subject {}", subject);
            }
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Admin role authorization middleware; must run after `jwt_auth`.
pub async fn admin_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !claims.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user registration, login, token refresh/revocation,
//! logout and password changes, and are designed to be nested into the main
//! Axum router.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::handlers::*;
use crate::auth::middleware::*;

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/revoke", post(revoke_token))
        .route("/logout", post(logout).layer(middleware::from_fn(jwt_auth)))
        .route(
            "/password",
            put(change_password).layer(middleware::from_fn(jwt_auth)),
        )
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}

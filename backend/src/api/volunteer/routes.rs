//! HTTP routes for volunteer applications.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::volunteer::handlers::*;
use crate::auth::middleware::jwt_auth;

/// Creates the volunteer-application router. Submitting is public; reading
/// applications requires an authenticated caller.
pub fn volunteer_router() -> Router {
    Router::new()
        .route("/", post(create_application))
        .route(
            "/",
            get(list_applications).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/by-email/{email}",
            get(get_application_by_email).layer(middleware::from_fn(jwt_auth)),
        )
}

//! HTTP routes for community members.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::community::handlers::*;
use crate::auth::middleware::jwt_auth;

/// Creates the community-member router. Registration is public; the member
/// list requires an authenticated caller.
pub fn community_router() -> Router {
    Router::new()
        .route("/", post(create_member))
        .route(
            "/",
            get(list_members).layer(middleware::from_fn(jwt_auth)),
        )
}

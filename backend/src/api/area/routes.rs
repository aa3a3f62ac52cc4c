//! HTTP routes for areas of interest.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::area::handlers::*;
use crate::auth::middleware::{admin_auth, jwt_auth};

/// Creates the area-of-interest router. Listing is public; curation is
/// restricted to admins.
pub fn area_router() -> Router {
    Router::new().route("/", get(list_areas)).route(
        "/",
        post(create_area)
            .layer(middleware::from_fn(admin_auth))
            .layer(middleware::from_fn(jwt_auth)),
    )
}

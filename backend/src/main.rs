//! Main entry point for the community-platform backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection and token issuer, and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall
//! structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use axum::{Extension, Router, response::Json, routing::get};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

use crate::config::Config;
use crate::database::Database;
use crate::utils::jwt::TokenIssuer;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    db.migrate().await.unwrap();
    let pool = db.pool().clone();

    // The signing configuration is resolved exactly once; everything
    // downstream receives this issuer by reference.
    let token_issuer = Arc::new(TokenIssuer::new(&config));

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/areas-of-interest", api::area::routes::area_router())
        .nest(
            "/api/community-members",
            api::community::routes::community_router(),
        )
        .nest(
            "/api/volunteer-applications",
            api::volunteer::routes::volunteer_router(),
        )
        .layer(Extension(pool))
        .layer(Extension(token_issuer));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!(
        "Starting Ecuador Comunidad server on port {}",
        config.server_port
    );
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Ecuador Comunidad Backend",
        "version": "0.1.0"
    }))
}

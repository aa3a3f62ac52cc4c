//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, and JWT signing material. Everything is
//! resolved once at startup; the resulting struct is immutable afterwards.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_expiration_minutes: i64,
    pub refresh_token_expiration_days: i64,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// A missing `JWT_SECRET` is a fatal startup error rather than a
    /// per-request one: token issuance cannot work without it.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let jwt_issuer =
            env::var("JWT_ISSUER").unwrap_or_else(|_| "EcuadorComunidadAPI".to_string());

        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "EcuadorComunidadClients".to_string());

        let access_token_expiration_minutes = env::var("JWT_ACCESS_TOKEN_EXPIRATION_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<i64>()
            .context("JWT_ACCESS_TOKEN_EXPIRATION_MINUTES must be a valid number")?;

        let refresh_token_expiration_days = env::var("JWT_REFRESH_TOKEN_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<i64>()
            .context("JWT_REFRESH_TOKEN_EXPIRATION_DAYS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_expiration_minutes,
            refresh_token_expiration_days,
            server_port,
        })
    }
}

//! JWT token utilities for authentication and authorization.
//!
//! Provides signed access-token creation, opaque refresh-token generation,
//! and claims validation for the authentication flow.

use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{Account, RefreshTokenRecord, Role};
use crate::errors::{ServiceError, ServiceResult};

/// JWT claims structure carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Account email
    pub email: String,
    /// Display name
    pub name: String,
    /// Account role, in its string form
    pub role: String,
    /// Unique token id, fresh per issued token
    pub jti: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn role(&self) -> Role {
        // Unknown role strings demote to Guest rather than erroring.
        self.role.parse().unwrap_or(Role::Guest)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Role::Admin)
    }
}

/// Issues and validates tokens with process-wide signing configuration.
///
/// Constructed once at startup from the loaded [`Config`]; no environment
/// lookups happen after construction, so tests can inject distinct secrets
/// and TTLs per case.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        TokenIssuer {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            access_token_ttl: Duration::minutes(config.access_token_expiration_minutes),
            refresh_token_ttl: Duration::days(config.refresh_token_expiration_days),
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Generates a signed access token for the account.
    pub fn issue_access_token(&self, account: &Account) -> ServiceResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.id.clone(),
            email: account.email.clone(),
            name: account.full_name.clone(),
            role: account.role.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_token_ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal(format!("Token generation failed: {}", e)))
    }

    /// Generates an opaque refresh token backed by 256 bits of OS entropy.
    /// The record starts active and unlinked.
    pub fn issue_refresh_token(&self) -> RefreshTokenRecord {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);

        let now = Utc::now();
        RefreshTokenRecord {
            token: general_purpose::STANDARD.encode(bytes),
            created_at: now,
            expires_at: now + self.refresh_token_ttl,
            revoked_at: None,
            replaced_by_token: None,
        }
    }

    /// Verifies signature, issuer and audience, and decodes the claims.
    ///
    /// `ignore_expiry` is used only by refresh flows; it skips the expiry
    /// check but still rejects wrong-algorithm or bad-signature tokens.
    pub fn validate_principal(&self, token: &str, ignore_expiry: bool) -> ServiceResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = !ignore_expiry;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::invalid_token(format!("Token validation failed: {}", e)))
    }

    /// Best-effort read of the subject claim without verifying the
    /// signature. Diagnostic and logging use only, never authorization.
    pub fn extract_user_id(token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims.sub)
    }
}

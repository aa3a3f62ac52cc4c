//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads exchanged with the
//! authentication endpoints. Password hashes and refresh-token history never
//! appear in any of these types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::database::models::Account;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Full name must be between 3 and 100 characters"
    ))]
    pub full_name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Requires at least one uppercase letter, one lowercase letter and a digit.
fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity").with_message(
            "Password must contain an uppercase letter, a lowercase letter and a digit".into(),
        ))
    }
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh/revoke request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    pub new_password: String,
}

/// Public user information returned by auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        UserInfo {
            id: account.id.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role.to_string(),
        }
    }
}

/// Response containing a fresh token pair and user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: UserInfo,
}

/// Response after a revoke request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeTokenResponse {
    pub revoked: bool,
}

//! Rust structs that represent the platform's persistent entities.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::common::Searchable;

/// Closed set of account roles. Serialized to and from its string form only
/// at the token and storage boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Moderator,
    User,
    Guest,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Moderator => write!(f, "Moderator"),
            Role::User => write!(f, "User"),
            Role::Guest => write!(f, "Guest"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Moderator" => Ok(Role::Moderator),
            "User" => Ok(Role::User),
            "Guest" => Ok(Role::Guest),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// A single opaque refresh credential, embedded in its owning account's
/// token history. Records are revoked in place and never reactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub replaced_by_token: Option<String>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }

    /// Marks the record revoked. Revocation is monotonic: a record that is
    /// already revoked keeps its original timestamp.
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
        }
    }
}

/// Identity record owned by the account store. Mutated only through the
/// auth service, never directly by the HTTP layer.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub refresh_tokens: Vec<RefreshTokenRecord>,
    /// Write counter backing the conditional replace in the account store.
    pub version: i64,
}

impl Account {
    /// Creates a fresh account with the default `User` role. The caller is
    /// responsible for hashing the password and lowercasing the email.
    pub fn new(email: String, full_name: String, password_hash: String) -> Self {
        Account {
            id: uuid::Uuid::now_v7().to_string(),
            email,
            full_name,
            password_hash,
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
            refresh_tokens: Vec::new(),
            version: 0,
        }
    }

    pub fn find_refresh_token(&self, token: &str) -> Option<&RefreshTokenRecord> {
        self.refresh_tokens.iter().find(|rt| rt.token == token)
    }

    pub fn find_refresh_token_mut(&mut self, token: &str) -> Option<&mut RefreshTokenRecord> {
        self.refresh_tokens.iter_mut().find(|rt| rt.token == token)
    }

    /// Revokes every currently active token. Returns how many were revoked.
    pub fn revoke_all_active(&mut self, now: DateTime<Utc>) -> usize {
        let mut revoked = 0;
        for record in self.refresh_tokens.iter_mut().filter(|rt| rt.is_active()) {
            record.revoke(now);
            revoked += 1;
        }
        revoked
    }

    /// Login-time retention: keeps only the `keep` most recently created
    /// active records. Older active records simply fall out of the list;
    /// inactive records are dropped entirely.
    pub fn retain_recent_active(&mut self, keep: usize) {
        let mut active: Vec<RefreshTokenRecord> = self
            .refresh_tokens
            .drain(..)
            .filter(|rt| rt.is_active())
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active.truncate(keep);
        self.refresh_tokens = active;
    }

    /// Rotation-time retention: drops records that are neither active nor
    /// revoked within the trailing `window`.
    pub fn purge_stale(&mut self, window: Duration) {
        let cutoff = Utc::now() - window;
        self.refresh_tokens
            .retain(|rt| rt.is_active() || rt.revoked_at.is_some_and(|at| at > cutoff));
    }
}

/// A curated area of interest volunteers can sign up for.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AreaOfInterest {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Searchable for AreaOfInterest {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

/// A registered member of the community.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

impl Searchable for CommunityMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.full_name, &self.email]
    }
}

/// A volunteer application submitted through the public form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerApplication {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub city: String,
    pub country: String,
    pub has_volunteering_experience: bool,
    pub areas_of_interest: Vec<String>,
    pub other_areas: String,
    pub available_time: String,
    pub skills_or_knowledge: String,
    pub why_volunteer: String,
    pub additional_comments: String,
    pub created_at: DateTime<Utc>,
}

impl Searchable for VolunteerApplication {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.full_name, &self.email, &self.city]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAreaOfInterest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Area name must be between 1-100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 500, message = "Description too long"))]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityMember {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1-100 characters"
    ))]
    pub full_name: String,
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolunteerApplication {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1-100 characters"
    ))]
    pub full_name: String,
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[serde(default)]
    pub has_volunteering_experience: bool,
    #[serde(default)]
    pub areas_of_interest: Vec<String>,
    #[serde(default)]
    pub other_areas: String,
    #[serde(default)]
    pub available_time: String,
    #[serde(default)]
    pub skills_or_knowledge: String,
    #[serde(default)]
    pub why_volunteer: String,
    #[serde(default)]
    pub additional_comments: String,
}

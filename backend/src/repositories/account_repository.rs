//! Persistence for accounts and their embedded refresh-token history.
//!
//! Accounts are read and written whole; the token list travels with its
//! owning account as a JSON column rather than a separate table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::database::models::{Account, RefreshTokenRecord, Role};

/// Storage contract for identity records.
///
/// `replace` is a conditional whole-record write keyed on the version the
/// caller read, so two concurrent rotations of the same token cannot
/// silently overwrite each other: exactly one writer wins.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Finds the account owning a refresh-token record with the given token
    /// string, regardless of the record's state.
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>>;

    async fn create(&self, account: &Account) -> Result<()>;

    /// Replaces the stored record if and only if its version still matches
    /// the one carried by `account`. Returns whether the write won.
    async fn replace(&self, account: &Account) -> Result<bool>;
}

/// SQLite-backed account store.
#[derive(Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    email: String,
    full_name: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    refresh_tokens: String,
    version: i64,
}

impl AccountRow {
    fn into_account(self) -> Result<Account> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| anyhow::anyhow!("corrupt account row: {}", e))?;
        let refresh_tokens: Vec<RefreshTokenRecord> = serde_json::from_str(&self.refresh_tokens)
            .context("corrupt refresh token list")?;

        Ok(Account {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            password_hash: self.password_hash,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
            refresh_tokens,
            version: self.version,
        })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, full_name, password_hash, role, is_active,
                   created_at, last_login_at, refresh_tokens, version
            FROM accounts WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, full_name, password_hash, role, is_active,
                   created_at, last_login_at, refresh_tokens, version
            FROM accounts WHERE lower(email) = lower(?)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT a.id, a.email, a.full_name, a.password_hash, a.role, a.is_active,
                   a.created_at, a.last_login_at, a.refresh_tokens, a.version
            FROM accounts a, json_each(a.refresh_tokens) rt
            WHERE json_extract(rt.value, '$.token') = ?
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(&self, account: &Account) -> Result<()> {
        let refresh_tokens = serde_json::to_string(&account.refresh_tokens)
            .context("failed to serialize refresh token list")?;

        sqlx::query(
            r#"
            INSERT INTO accounts
                (id, email, full_name, password_hash, role, is_active,
                 created_at, last_login_at, refresh_tokens, version)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .bind(account.role.to_string())
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.last_login_at)
        .bind(refresh_tokens)
        .bind(account.version)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace(&self, account: &Account) -> Result<bool> {
        let refresh_tokens = serde_json::to_string(&account.refresh_tokens)
            .context("failed to serialize refresh token list")?;

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = ?, full_name = ?, password_hash = ?, role = ?,
                is_active = ?, last_login_at = ?, refresh_tokens = ?,
                version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .bind(account.role.to_string())
        .bind(account.is_active)
        .bind(account.last_login_at)
        .bind(refresh_tokens)
        .bind(&account.id)
        .bind(account.version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::config::Config;

    async fn test_store() -> SqliteAccountStore {
        let config = Config {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "a-test-secret".into(),
            jwt_issuer: "TestIssuer".into(),
            jwt_audience: "TestAudience".into(),
            access_token_expiration_minutes: 15,
            refresh_token_expiration_days: 7,
            server_port: 3000,
        };
        let db = Database::new(&config).await.unwrap();
        db.migrate().await.unwrap();
        SqliteAccountStore::new(db.pool().clone())
    }

    fn account(email: &str) -> Account {
        Account::new(email.into(), "Carla Jimenez".into(), "hash".into())
    }

    fn token_record(token: &str) -> RefreshTokenRecord {
        let now = Utc::now();
        RefreshTokenRecord {
            token: token.into(),
            created_at: now,
            expires_at: now + chrono::Duration::days(7),
            revoked_at: None,
            replaced_by_token: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_find_by_id_round_trips() {
        let store = test_store().await;
        let mut created = account("carla@example.com");
        created.refresh_tokens.push(token_record("tok-1"));
        store.create(&created).await.unwrap();

        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.email, "carla@example.com");
        assert_eq!(found.role, Role::User);
        assert_eq!(found.refresh_tokens.len(), 1);
        assert_eq!(found.refresh_tokens[0].token, "tok-1");
        assert_eq!(found.version, 0);
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let store = test_store().await;
        store.create(&account("carla@example.com")).await.unwrap();

        let found = store.find_by_email("CARLA@Example.COM").await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_refresh_token_matches_any_state() {
        let store = test_store().await;
        let mut created = account("carla@example.com");
        let mut revoked = token_record("revoked-tok");
        revoked.revoke(Utc::now());
        created.refresh_tokens.push(revoked);
        created.refresh_tokens.push(token_record("active-tok"));
        store.create(&created).await.unwrap();

        let by_active = store.find_by_refresh_token("active-tok").await.unwrap();
        assert_eq!(by_active.unwrap().id, created.id);

        // Revoked records still locate their owner; the service decides
        // what a revoked presentation means.
        let by_revoked = store.find_by_refresh_token("revoked-tok").await.unwrap();
        assert_eq!(by_revoked.unwrap().id, created.id);

        assert!(store.find_by_refresh_token("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_is_conditional_on_version() {
        let store = test_store().await;
        let created = account("carla@example.com");
        store.create(&created).await.unwrap();

        let mut fresh = store.find_by_id(&created.id).await.unwrap().unwrap();
        fresh.full_name = "Carla J.".into();
        assert!(store.replace(&fresh).await.unwrap());

        // The same snapshot now carries a stale version and must lose.
        fresh.full_name = "Second Writer".into();
        assert!(!store.replace(&fresh).await.unwrap());

        let stored = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.full_name, "Carla J.");
        assert_eq!(stored.version, 1);
    }
}

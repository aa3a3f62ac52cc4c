//! Core business logic for the authentication system.
//!
//! Implements registration, login, refresh-token rotation, revocation,
//! logout and password change as one coherent protocol on top of the
//! account store and token issuer. The per-account state machine lives in
//! the refresh-token records, not in the account itself.

use chrono::{Duration, Utc};
use validator::Validate;

use crate::api::common::validation_errors_to_message;
use crate::auth::models::*;
use crate::database::models::Account;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::account_repository::AccountStore;
use crate::utils::jwt::TokenIssuer;
use crate::utils::password::{hash_password, verify_password};

/// Number of active refresh tokens retained per account after a login.
const MAX_ACTIVE_REFRESH_TOKENS: usize = 5;

/// How long revoked records are kept after a rotation, as a forensic window.
const REVOKED_RETENTION_HOURS: i64 = 24;

enum RotationOutcome {
    Rotated(Box<LoginResponse>),
    /// Lost the conditional write against a concurrent rotation.
    Conflict,
}

/// Authentication service handling the account/token lifecycle.
pub struct AuthService<S> {
    store: S,
    tokens: TokenIssuer,
}

impl<S: AccountStore> AuthService<S> {
    pub fn new(store: S, tokens: TokenIssuer) -> Self {
        AuthService { store, tokens }
    }

    /// Registers a new account and signs it in.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<LoginResponse> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let email = request.email.trim().to_lowercase();
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::already_exists("Account", &email));
        }

        let password_hash = hash_password(&request.password)?;
        let mut account = Account::new(email, request.full_name.trim().to_string(), password_hash);
        self.store.create(&account).await?;

        let access_token = self.tokens.issue_access_token(&account)?;
        let refresh_token = self.tokens.issue_refresh_token();
        let refresh_token_value = refresh_token.token.clone();
        account.refresh_tokens.push(refresh_token);

        if !self.store.replace(&account).await? {
            return Err(ServiceError::internal(
                "Concurrent update while registering account",
            ));
        }

        tracing::info!("Account registered: {}", account.email);
        Ok(self.login_response(access_token, refresh_token_value, &account))
    }

    /// Authenticates a user and issues a fresh token pair.
    ///
    /// A missing account, an inactive account and a failed password check
    /// all produce the same `InvalidCredentials`, so callers cannot probe
    /// which of the three it was.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let mut account = match self.store.find_by_email(request.email.trim()).await? {
            Some(account) if account.is_active => account,
            _ => {
                tracing::warn!("Login rejected for {}", request.email);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password(&request.password, &account.password_hash) {
            tracing::warn!("Login rejected for {}", request.email);
            return Err(ServiceError::InvalidCredentials);
        }

        account.last_login_at = Some(Utc::now());

        let access_token = self.tokens.issue_access_token(&account)?;
        let refresh_token = self.tokens.issue_refresh_token();
        let refresh_token_value = refresh_token.token.clone();
        account.refresh_tokens.push(refresh_token);
        account.retain_recent_active(MAX_ACTIVE_REFRESH_TOKENS);

        if !self.store.replace(&account).await? {
            return Err(ServiceError::internal("Concurrent update during login"));
        }

        tracing::info!("User logged in: {}", account.email);
        Ok(self.login_response(access_token, refresh_token_value, &account))
    }

    /// Rotates a refresh token: revokes the presented record, issues a new
    /// pair, and links the old record to its replacement.
    ///
    /// Presenting a revoked token fails; a rotation chain never forks. The
    /// revoke-and-append write is conditional on the account version, and a
    /// lost race is retried once from a fresh read before giving up.
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> ServiceResult<LoginResponse> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        match self.try_rotate(&request.refresh_token).await? {
            RotationOutcome::Rotated(response) => Ok(*response),
            RotationOutcome::Conflict => match self.try_rotate(&request.refresh_token).await? {
                RotationOutcome::Rotated(response) => Ok(*response),
                RotationOutcome::Conflict => Err(ServiceError::invalid_token(
                    "Refresh token rotated concurrently",
                )),
            },
        }
    }

    async fn try_rotate(&self, presented: &str) -> ServiceResult<RotationOutcome> {
        let mut account = self
            .store
            .find_by_refresh_token(presented)
            .await?
            .ok_or_else(|| ServiceError::invalid_token("Unknown refresh token"))?;
        let account_id = account.id.clone();

        let new_refresh = self.tokens.issue_refresh_token();
        let new_refresh_value = new_refresh.token.clone();
        let now = Utc::now();

        match account.find_refresh_token_mut(presented) {
            None => return Err(ServiceError::invalid_token("Unknown refresh token")),
            Some(record) if !record.is_active() => {
                tracing::warn!(
                    "Inactive refresh token presented for account {}; possible token reuse",
                    account_id
                );
                return Err(ServiceError::invalid_token(
                    "Refresh token expired or revoked",
                ));
            }
            Some(record) => {
                record.revoke(now);
                record.replaced_by_token = Some(new_refresh_value.clone());
            }
        }

        account.refresh_tokens.push(new_refresh);
        account.purge_stale(Duration::hours(REVOKED_RETENTION_HOURS));

        if !self.store.replace(&account).await? {
            return Ok(RotationOutcome::Conflict);
        }

        let access_token = self.tokens.issue_access_token(&account)?;
        Ok(RotationOutcome::Rotated(Box::new(self.login_response(
            access_token,
            new_refresh_value,
            &account,
        ))))
    }

    /// Revokes a single refresh token.
    ///
    /// Returns `Ok(false)` when the token is unknown or already inactive;
    /// that is not an error for this endpoint.
    pub async fn revoke_token(&self, request: RefreshTokenRequest) -> ServiceResult<bool> {
        let Some(mut account) = self
            .store
            .find_by_refresh_token(&request.refresh_token)
            .await?
        else {
            return Ok(false);
        };

        match account.find_refresh_token_mut(&request.refresh_token) {
            Some(record) if record.is_active() => record.revoke(Utc::now()),
            _ => return Ok(false),
        }

        if !self.store.replace(&account).await? {
            // A concurrent write got there first; the state we read is gone.
            return Ok(false);
        }

        tracing::info!("Refresh token revoked for account {}", account.id);
        Ok(true)
    }

    /// Revokes every active refresh token for the account. Idempotent, and
    /// silently a no-op when the account does not exist.
    pub async fn logout(&self, user_id: &str) -> ServiceResult<()> {
        let Some(mut account) = self.store.find_by_id(user_id).await? else {
            return Ok(());
        };

        if account.revoke_all_active(Utc::now()) == 0 {
            return Ok(());
        }

        if !self.store.replace(&account).await? {
            return Err(ServiceError::internal("Concurrent update during logout"));
        }

        tracing::info!("All sessions revoked for account {}", account.id);
        Ok(())
    }

    /// Replaces the password and revokes all active sessions, forcing a
    /// re-login on every device.
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let mut account = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", user_id))?;

        if !verify_password(&request.current_password, &account.password_hash) {
            return Err(ServiceError::unauthorized("Current password is incorrect"));
        }

        account.password_hash = hash_password(&request.new_password)?;
        account.revoke_all_active(Utc::now());

        if !self.store.replace(&account).await? {
            return Err(ServiceError::internal(
                "Concurrent update during password change",
            ));
        }

        tracing::info!(
            "Password changed for account {}; all sessions revoked",
            account.id
        );
        Ok(())
    }

    /// Pure read of the public profile; `None` when the account is unknown.
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<Option<UserInfo>> {
        Ok(self
            .store
            .find_by_id(user_id)
            .await?
            .map(|account| UserInfo::from(&account)))
    }

    /// Pure read by email; a blank email short-circuits to `None`.
    pub async fn get_by_email(&self, email: &str) -> ServiceResult<Option<UserInfo>> {
        if email.trim().is_empty() {
            return Ok(None);
        }
        Ok(self
            .store
            .find_by_email(email)
            .await?
            .map(|account| UserInfo::from(&account)))
    }

    fn login_response(
        &self,
        access_token: String,
        refresh_token: String,
        account: &Account,
    ) -> LoginResponse {
        LoginResponse {
            access_token,
            refresh_token,
            expires_at: Utc::now() + self.tokens.access_token_ttl(),
            user: UserInfo::from(account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::models::RefreshTokenRecord;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// In-memory account store with the same conditional-replace semantics
    /// as the SQLite implementation.
    #[derive(Default, Clone)]
    struct MemoryAccountStore {
        accounts: Arc<Mutex<Vec<Account>>>,
    }

    impl MemoryAccountStore {
        fn snapshot(&self, id: &str) -> Account {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .unwrap()
        }

        fn set_active(&self, id: &str, active: bool) {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts.iter_mut().find(|a| a.id == id).unwrap();
            account.is_active = active;
            account.version += 1;
        }
    }

    #[async_trait]
    impl AccountStore for MemoryAccountStore {
        async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.refresh_tokens.iter().any(|rt| rt.token == token))
                .cloned())
        }

        async fn create(&self, account: &Account) -> Result<()> {
            self.accounts.lock().unwrap().push(account.clone());
            Ok(())
        }

        async fn replace(&self, account: &Account) -> Result<bool> {
            let mut accounts = self.accounts.lock().unwrap();
            let Some(stored) = accounts.iter_mut().find(|a| a.id == account.id) else {
                return Ok(false);
            };
            if stored.version != account.version {
                return Ok(false);
            }
            let mut updated = account.clone();
            updated.version += 1;
            *stored = updated;
            Ok(true)
        }
    }

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&Config {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "a-test-secret".into(),
            jwt_issuer: "TestIssuer".into(),
            jwt_audience: "TestAudience".into(),
            access_token_expiration_minutes: 15,
            refresh_token_expiration_days: 7,
            server_port: 3000,
        })
    }

    fn test_service() -> (AuthService<MemoryAccountStore>, MemoryAccountStore) {
        let store = MemoryAccountStore::default();
        (AuthService::new(store.clone(), test_issuer()), store)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Ana Morales".into(),
            email: email.into(),
            password: "Password1".into(),
            confirm_password: "Password1".into(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    fn refresh_request(token: &str) -> RefreshTokenRequest {
        RefreshTokenRequest {
            refresh_token: token.into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_end_to_end() {
        let (service, _store) = test_service();

        let registered = service.register(register_request("a@x.com")).await.unwrap();
        assert_eq!(registered.user.email, "a@x.com");
        assert_eq!(registered.user.role, "User");

        let logged_in = service
            .login(login_request("a@x.com", "Password1"))
            .await
            .unwrap();

        // A login always mints a fresh refresh token.
        assert_ne!(logged_in.refresh_token, registered.refresh_token);
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_lowercases_email_and_checks_duplicates_case_insensitively() {
        let (service, _store) = test_service();

        let registered = service
            .register(register_request("Ana@Example.COM"))
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ana@example.com");

        let duplicate = service.register(register_request("ANA@example.com")).await;
        assert!(matches!(
            duplicate,
            Err(ServiceError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_registration_leaves_first_account_intact() {
        let (service, store) = test_service();

        let first = service.register(register_request("a@x.com")).await.unwrap();
        let _ = service.register(register_request("a@x.com")).await;

        assert_eq!(store.accounts.lock().unwrap().len(), 1);
        // The original credentials still work.
        let login = service.login(login_request("a@x.com", "Password1")).await;
        assert_eq!(login.unwrap().user.id, first.user.id);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_or_mismatched_passwords() {
        let (service, _store) = test_service();

        let mut weak = register_request("a@x.com");
        weak.password = "alllowercase1".into();
        weak.confirm_password = "alllowercase1".into();
        assert!(matches!(
            service.register(weak).await,
            Err(ServiceError::Validation { .. })
        ));

        let mut mismatched = register_request("a@x.com");
        mismatched.confirm_password = "Password2".into();
        assert!(matches!(
            service.register(mismatched).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let unknown = service.login(login_request("b@x.com", "Password1")).await;
        assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));

        let wrong_password = service.login(login_request("a@x.com", "Password2")).await;
        assert!(matches!(
            wrong_password,
            Err(ServiceError::InvalidCredentials)
        ));

        store.set_active(&registered.user.id, false);
        let inactive = service.login(login_request("a@x.com", "Password1")).await;
        assert!(matches!(inactive, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_updates_last_login_and_stores_active_token() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let logged_in = service
            .login(login_request("a@x.com", "Password1"))
            .await
            .unwrap();

        let account = store.snapshot(&registered.user.id);
        assert!(account.last_login_at.is_some());
        let record = account.find_refresh_token(&logged_in.refresh_token).unwrap();
        assert!(record.is_active());
    }

    #[tokio::test]
    async fn test_retention_keeps_five_active_tokens_after_six_logins() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        for _ in 0..6 {
            service
                .login(login_request("a@x.com", "Password1"))
                .await
                .unwrap();
        }

        let account = store.snapshot(&registered.user.id);
        let active = account
            .refresh_tokens
            .iter()
            .filter(|rt| rt.is_active())
            .count();
        assert_eq!(active, 5);
        assert_eq!(account.refresh_tokens.len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_links_replacement() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let rotated = service
            .refresh_token(refresh_request(&registered.refresh_token))
            .await
            .unwrap();
        assert_ne!(rotated.refresh_token, registered.refresh_token);

        let account = store.snapshot(&registered.user.id);
        let old = account
            .find_refresh_token(&registered.refresh_token)
            .unwrap();
        assert!(old.is_revoked());
        assert_eq!(
            old.replaced_by_token.as_deref(),
            Some(rotated.refresh_token.as_str())
        );
        let new = account.find_refresh_token(&rotated.refresh_token).unwrap();
        assert!(new.is_active());
    }

    #[tokio::test]
    async fn test_refresh_with_revoked_token_fails_without_side_effects() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let rotated = service
            .refresh_token(refresh_request(&registered.refresh_token))
            .await
            .unwrap();

        // Reusing the rotated-away token must fail as possible theft.
        let reuse = service
            .refresh_token(refresh_request(&registered.refresh_token))
            .await;
        assert!(matches!(reuse, Err(ServiceError::InvalidToken { .. })));

        // The replacement's state is untouched by the failed reuse.
        let account = store.snapshot(&registered.user.id);
        let replacement = account.find_refresh_token(&rotated.refresh_token).unwrap();
        assert!(replacement.is_active());
        assert!(replacement.replaced_by_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_unknown_token_fails() {
        let (service, _store) = test_service();
        let result = service.refresh_token(refresh_request("no-such-token")).await;
        assert!(matches!(result, Err(ServiceError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_revoke_token_reports_state_changes_only() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        assert!(
            service
                .revoke_token(refresh_request(&registered.refresh_token))
                .await
                .unwrap()
        );
        let account = store.snapshot(&registered.user.id);
        assert!(
            account
                .find_refresh_token(&registered.refresh_token)
                .unwrap()
                .is_revoked()
        );

        // Revoking again, or revoking an unknown token, is false, not an error.
        assert!(
            !service
                .revoke_token(refresh_request(&registered.refresh_token))
                .await
                .unwrap()
        );
        assert!(!service.revoke_token(refresh_request("missing")).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_revokes_all_active_tokens() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();
        service
            .login(login_request("a@x.com", "Password1"))
            .await
            .unwrap();

        service.logout(&registered.user.id).await.unwrap();

        let account = store.snapshot(&registered.user.id);
        assert!(account.refresh_tokens.iter().all(|rt| !rt.is_active()));

        // Idempotent, and unknown accounts are a silent no-op.
        service.logout(&registered.user.id).await.unwrap();
        service.logout("no-such-user").await.unwrap();
    }

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let (service, _store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let wrong = service
            .change_password(
                &registered.user.id,
                ChangePasswordRequest {
                    current_password: "WrongPass1".into(),
                    new_password: "NewPassword1".into(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized { .. })));

        let missing = service
            .change_password(
                "no-such-user",
                ChangePasswordRequest {
                    current_password: "Password1".into(),
                    new_password: "NewPassword1".into(),
                },
            )
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_change_password_revokes_sessions_and_swaps_hash() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();
        service
            .login(login_request("a@x.com", "Password1"))
            .await
            .unwrap();

        // Revoke one token up front so we can check it stays revoked.
        service
            .revoke_token(refresh_request(&registered.refresh_token))
            .await
            .unwrap();
        let before = store.snapshot(&registered.user.id);
        let previously_revoked_at = before
            .find_refresh_token(&registered.refresh_token)
            .unwrap()
            .revoked_at;

        service
            .change_password(
                &registered.user.id,
                ChangePasswordRequest {
                    current_password: "Password1".into(),
                    new_password: "NewPassword1".into(),
                },
            )
            .await
            .unwrap();

        let account = store.snapshot(&registered.user.id);
        assert!(account.refresh_tokens.iter().all(|rt| !rt.is_active()));
        // No un-revocation and no re-stamping of already revoked records.
        assert_eq!(
            account
                .find_refresh_token(&registered.refresh_token)
                .unwrap()
                .revoked_at,
            previously_revoked_at
        );

        assert!(matches!(
            service.login(login_request("a@x.com", "Password1")).await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(
            service
                .login(login_request("a@x.com", "NewPassword1"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_profile_reads_return_none_when_missing() {
        let (service, _store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        let profile = service.get_profile(&registered.user.id).await.unwrap();
        assert_eq!(profile.unwrap().email, "a@x.com");
        assert!(service.get_profile("missing").await.unwrap().is_none());

        let by_email = service.get_by_email("A@X.COM").await.unwrap();
        assert!(by_email.is_some());
        assert!(service.get_by_email("   ").await.unwrap().is_none());
    }

    /// Store wrapper that loses the first `replace` as if a concurrent
    /// writer had won the version race.
    #[derive(Clone)]
    struct LoseFirstReplace {
        inner: MemoryAccountStore,
        lost: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl AccountStore for LoseFirstReplace {
        async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
            self.inner.find_by_email(email).await
        }
        async fn find_by_refresh_token(&self, token: &str) -> Result<Option<Account>> {
            self.inner.find_by_refresh_token(token).await
        }
        async fn create(&self, account: &Account) -> Result<()> {
            self.inner.create(account).await
        }
        async fn replace(&self, account: &Account) -> Result<bool> {
            {
                let mut lost = self.lost.lock().unwrap();
                if !*lost {
                    *lost = true;
                    return Ok(false);
                }
            }
            self.inner.replace(account).await
        }
    }

    #[tokio::test]
    async fn test_rotation_retries_once_after_losing_the_version_race() {
        let (setup_service, store) = test_service();
        let registered = setup_service
            .register(register_request("a@x.com"))
            .await
            .unwrap();

        // The token is still active after the lost write, so the single
        // retry reads fresh state and succeeds.
        let racing = AuthService::new(
            LoseFirstReplace {
                inner: store.clone(),
                lost: Arc::new(Mutex::new(false)),
            },
            test_issuer(),
        );
        let rotated = racing
            .refresh_token(refresh_request(&registered.refresh_token))
            .await;
        assert!(rotated.is_ok());

        let account = store.snapshot(&registered.user.id);
        assert!(
            account
                .find_refresh_token(&registered.refresh_token)
                .unwrap()
                .is_revoked()
        );
    }

    #[tokio::test]
    async fn test_rotation_purges_long_revoked_records() {
        let (service, store) = test_service();
        let registered = service.register(register_request("a@x.com")).await.unwrap();

        // Plant a record revoked three days ago alongside the live one.
        {
            let mut accounts = store.accounts.lock().unwrap();
            let account = accounts
                .iter_mut()
                .find(|a| a.id == registered.user.id)
                .unwrap();
            let now = Utc::now();
            account.refresh_tokens.push(RefreshTokenRecord {
                token: "ancient".into(),
                created_at: now - Duration::days(4),
                expires_at: now + Duration::days(3),
                revoked_at: Some(now - Duration::days(3)),
                replaced_by_token: None,
            });
            account.version += 1;
        }

        service
            .refresh_token(refresh_request(&registered.refresh_token))
            .await
            .unwrap();

        let account = store.snapshot(&registered.user.id);
        assert!(account.find_refresh_token("ancient").is_none());
        // The just-revoked record stays inside the forensic window.
        assert!(
            account
                .find_refresh_token(&registered.refresh_token)
                .is_some()
        );
    }
}

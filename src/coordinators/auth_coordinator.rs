use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::{Role, user};
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

/// Orchestrates registration, login and token introspection
pub struct AuthCoordinator {
    app_data: Arc<AppData>,
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: user::Model,
    pub access_token: String,
    pub claims: Claims,
    pub expires_in: i64,
}

fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// Register a new user with role `user`
    ///
    /// Duplicate usernames are rejected before hashing so no row is written.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(InternalError::validation("username", "must not be empty"));
        }
        if password.is_empty() {
            return Err(InternalError::validation("password", "must not be empty"));
        }
        if self.app_data.seed_settings.is_reserved(&username) {
            return Err(CredentialError::ReservedUsername(username).into());
        }

        let db = &self.app_data.db;
        if self.app_data.user_store.find_by_username(db, &username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(username).into());
        }

        let password_hash = self.app_data.crypto_provider.hash_password(password)?;
        let user = self
            .app_data
            .user_store
            .create_user(db, &username, password_hash, Role::User)
            .await?;

        tracing::info!("Registered user {} ({})", user.username, user.id);

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::UserRegistered)
            .with_context(ctx)
            .user_id(user.id)
            .add_field("username", &user.username)
            .write()
            .await
        {
            tracing::error!("Failed to log registration: {:?}", audit_err);
        }

        Ok(user)
    }

    /// Verify credentials and issue an access token
    ///
    /// Unknown, inactive and wrong-password attempts all end in
    /// `InvalidCredentials`; only the activity log tells them apart.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        let username = normalize_username(username);
        let db = &self.app_data.db;

        let user = match self.app_data.user_store.find_by_username(db, &username).await? {
            Some(user) if user.is_active => user,
            _ => {
                self.log_failed_login(ctx, None, &username, "User not found").await;
                return Err(CredentialError::InvalidCredentials.into());
            }
        };

        if !self
            .app_data
            .crypto_provider
            .verify_password(password, &user.password_hash)?
        {
            self.log_failed_login(ctx, Some(user.id), &username, "Invalid password")
                .await;
            return Err(CredentialError::InvalidCredentials.into());
        }

        let ip_address = ctx.ip_address.map(|ip| ip.to_string());
        let user = self.app_data.user_store.record_login(db, user, ip_address).await?;
        let (access_token, claims) = self.app_data.token_provider.issue_token(&user)?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_login_success(ctx, user.id, &user.username)
            .await
        {
            tracing::error!("Failed to log login: {:?}", audit_err);
        }

        Ok(LoginOutcome {
            user,
            access_token,
            claims,
            expires_in: self.app_data.token_provider.expires_in(),
        })
    }

    /// Current user for an authenticated context
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        let user_id = ctx.user_id().ok_or(CredentialError::MissingAuthentication)?;
        self.app_data.user_store.get_by_id(&self.app_data.db, user_id).await
    }

    async fn log_failed_login(&self, ctx: &RequestContext, user_id: Option<i32>, username: &str, reason: &str) {
        tracing::debug!("Login failed for {}: {}", username, reason);
        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_login_failed(ctx, user_id, username, reason)
            .await
        {
            tracing::error!("Failed to log login failure: {:?}", audit_err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::AccountError;
    use crate::test::utils::{context_for, create_user_with_password, setup_test_app_data};
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn test_register_normalizes_username() {
        let (app_data, _dir) = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data.clone());

        let user = coordinator
            .register(&RequestContext::new(), "  Alice ", "wonderland")
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::User);
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_registration_writes_nothing() {
        let (app_data, _dir) = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();

        coordinator.register(&ctx, "alice", "first").await.unwrap();
        let err = coordinator.register(&ctx, "ALICE", "second").await.unwrap_err();

        assert!(matches!(err, InternalError::Credential(CredentialError::DuplicateUsername(_))));
        assert_eq!(app_data.user_store.count_users(&app_data.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_reserved_and_empty_names() {
        let (app_data, _dir) = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();

        let err = coordinator.register(&ctx, "Owner", "pw").await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::ReservedUsername(_))));

        let err = coordinator.register(&ctx, "   ", "pw").await.unwrap_err();
        assert!(matches!(err, InternalError::Validation { .. }));

        let err = coordinator.register(&ctx, "bob", "").await.unwrap_err();
        assert!(matches!(err, InternalError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_login_issues_token_and_records_ip() {
        let (app_data, _dir) = setup_test_app_data().await;
        create_user_with_password(&app_data, "alice", "wonderland", Role::User).await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        let ctx = RequestContext::new().with_ip_address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 9)));

        let outcome = coordinator.login(&ctx, "Alice", "wonderland").await.unwrap();

        assert_eq!(outcome.user.ip_address.as_deref(), Some("192.168.1.9"));
        assert!(outcome.user.last_login_at.is_some());
        assert_eq!(outcome.expires_in, 1440 * 60);
        let claims = app_data.token_provider.validate_jwt(&outcome.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(outcome.user.id));

        let logs = app_data
            .activity_log_store
            .list_recent(&app_data.db, 10, Some("LOGIN_SUCCESS"))
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let (app_data, _dir) = setup_test_app_data().await;
        let alice = create_user_with_password(&app_data, "alice", "wonderland", Role::User).await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();

        let wrong_password = coordinator.login(&ctx, "alice", "nope").await.unwrap_err();
        let unknown_user = coordinator.login(&ctx, "ghost", "nope").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, InternalError::Credential(CredentialError::InvalidCredentials)));

        let logs = app_data
            .activity_log_store
            .list_recent(&app_data.db, 10, Some("LOGIN_FAILED"))
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        // newest first: the unknown user attempt has no user id
        assert!(logs[0].0.user_id.is_none());
        assert_eq!(logs[1].0.user_id, Some(alice.id));
        assert!(logs[1].0.details.as_deref().unwrap().contains("Invalid password"));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let (app_data, _dir) = setup_test_app_data().await;
        let alice = create_user_with_password(&app_data, "alice", "wonderland", Role::User).await;
        app_data.user_store.set_active(&app_data.db, alice.id, false).await.unwrap();
        let coordinator = AuthCoordinator::new(app_data.clone());

        let err = coordinator
            .login(&RequestContext::new(), "alice", "wonderland")
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_whoami() {
        let (app_data, _dir) = setup_test_app_data().await;
        let alice = create_user_with_password(&app_data, "alice", "wonderland", Role::User).await;
        let coordinator = AuthCoordinator::new(app_data.clone());

        let me = coordinator.whoami(&context_for(&alice)).await.unwrap();
        assert_eq!(me.id, alice.id);

        let err = coordinator.whoami(&RequestContext::new()).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::MissingAuthentication)));

        let mut ghost = alice.clone();
        ghost.id = 999;
        let err = coordinator.whoami(&context_for(&ghost)).await.unwrap_err();
        assert!(matches!(err, InternalError::Account(AccountError::UserNotFound(999))));
    }
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditBuilder;
use crate::errors::InternalError;
use crate::stores::ActivityLogStore;
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::context::RequestContext;

/// Writes activity log entries
///
/// Entries are written on the shared pool, never inside a caller's
/// transaction, so callers log after they commit.
pub struct AuditLogger {
    db: DatabaseConnection,
    store: Arc<ActivityLogStore>,
}

impl AuditLogger {
    pub fn new(db: DatabaseConnection, store: Arc<ActivityLogStore>) -> Self {
        Self { db, store }
    }

    /// Create an AuditBuilder for a custom entry
    pub fn builder(&self, action: ActivityAction) -> AuditBuilder {
        AuditBuilder::new(self.db.clone(), self.store.clone(), action)
    }

    /// Log a failed login attempt
    ///
    /// The attempted username is recorded as given so brute-force attempts
    /// against one account can be spotted. `user_id` is set when the account
    /// exists.
    pub async fn log_login_failed(
        &self,
        ctx: &RequestContext,
        user_id: Option<i32>,
        username: &str,
        reason: &str,
    ) -> Result<(), InternalError> {
        let mut builder = self
            .builder(ActivityAction::LoginFailed)
            .with_context(ctx)
            .add_field("username", username)
            .add_field("reason", reason);
        if let Some(user_id) = user_id {
            builder = builder.user_id(user_id);
        }

        builder.write().await.map(|_| ())
    }

    pub async fn log_login_success(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        username: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityAction::LoginSuccess)
            .with_context(ctx)
            .user_id(user_id)
            .add_field("username", username)
            .write()
            .await
            .map(|_| ())
    }

    /// Log an action by the context's user against a single target row
    pub async fn log_action(
        &self,
        ctx: &RequestContext,
        action: ActivityAction,
        target_key: &str,
        target_id: i32,
    ) -> Result<(), InternalError> {
        self.builder(action)
            .with_context(ctx)
            .add_field(target_key, target_id)
            .write()
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_login_failed_has_no_user() {
        let db = setup_test_db().await;
        let store = Arc::new(ActivityLogStore::new());
        let logger = AuditLogger::new(db.clone(), store.clone());

        logger
            .log_login_failed(&RequestContext::new(), None, "ghost", "User not found")
            .await
            .unwrap();

        let rows = store
            .list_recent(&db, 10, Some(ActivityAction::LoginFailed.as_str()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].0.user_id.is_none());
        assert!(rows[0].0.details.as_deref().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_log_action_records_target() {
        let db = setup_test_db().await;
        let store = Arc::new(ActivityLogStore::new());
        let logger = AuditLogger::new(db.clone(), store.clone());

        logger
            .log_action(&RequestContext::new(), ActivityAction::ProductDeleted, "productId", 12)
            .await
            .unwrap();

        let rows = store.list_recent(&db, 10, None).await.unwrap();
        let details: serde_json::Value =
            serde_json::from_str(rows[0].0.details.as_deref().unwrap()).unwrap();
        assert_eq!(details["productId"], 12);
    }
}

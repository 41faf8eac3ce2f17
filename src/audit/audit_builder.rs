use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::json;

use crate::errors::InternalError;
use crate::stores::ActivityLogStore;
use crate::types::db::activity_log;
use crate::types::internal::audit::{ActivityAction, ActivityEntry};
use crate::types::internal::context::RequestContext;

/// Builder for activity log entries
///
/// Provides a fluent API for attaching request metadata and action-specific
/// details before the entry is written.
///
/// # Example
/// ```ignore
/// audit_logger
///     .builder(ActivityAction::PaymentApproved)
///     .with_context(&ctx)
///     .add_field("payment_id", payment.id)
///     .write()
///     .await?;
/// ```
pub struct AuditBuilder {
    entry: ActivityEntry,
    db: DatabaseConnection,
    store: Arc<ActivityLogStore>,
}

impl AuditBuilder {
    pub fn new(db: DatabaseConnection, store: Arc<ActivityLogStore>, action: ActivityAction) -> Self {
        Self {
            entry: ActivityEntry::new(action.as_str()),
            db,
            store,
        }
    }

    /// Populate user, IP, user agent and request id from the context
    ///
    /// The acting user is taken from the JWT claims; unauthenticated
    /// requests leave `user_id` empty.
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.entry.user_id = ctx.user_id();
        self.entry.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        self.entry.user_agent = ctx.user_agent.clone();
        self.entry
            .details
            .insert("request_id".to_string(), json!(ctx.request_id.to_string()));
        self
    }

    /// Override the acting user
    pub fn user_id(mut self, user_id: i32) -> Self {
        self.entry.user_id = Some(user_id);
        self
    }

    /// Add an arbitrary detail field
    pub fn add_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.details.insert(key.into(), json_value);
        }
        self
    }

    pub async fn write(self) -> Result<activity_log::Model, InternalError> {
        let AuditBuilder { entry, db, store } = self;
        store.insert(&db, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_db};
    use crate::types::db::Role;
    use crate::types::internal::auth::Claims;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn test_context_fields_are_copied() {
        let db = setup_test_db().await;
        let store = Arc::new(ActivityLogStore::new());
        let staff = create_test_user(&db, "staff", Role::Admin).await;
        let ctx = RequestContext::new()
            .with_ip_address(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)))
            .with_user_agent("curl/8.0")
            .with_claims(Claims {
                sub: staff.id.to_string(),
                username: "staff".to_string(),
                role: Role::Admin,
                exp: 0,
                iat: 0,
                jti: "jti".to_string(),
            });

        let row = AuditBuilder::new(db.clone(), store, ActivityAction::ProductCreated)
            .with_context(&ctx)
            .write()
            .await
            .unwrap();

        assert_eq!(row.action, "PRODUCT_CREATED");
        assert_eq!(row.user_id, Some(staff.id));
        assert_eq!(row.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(row.user_agent.as_deref(), Some("curl/8.0"));
        let details: serde_json::Value = serde_json::from_str(row.details.as_deref().unwrap()).unwrap();
        assert_eq!(details["request_id"], json!(ctx.request_id.to_string()));
    }

    #[tokio::test]
    async fn test_write_persists_entry() {
        let db = setup_test_db().await;
        let store = Arc::new(ActivityLogStore::new());

        AuditBuilder::new(db.clone(), store.clone(), ActivityAction::SettingUpdated)
            .add_field("key", "pix_key")
            .write()
            .await
            .unwrap();

        let rows = store.list_recent(&db, 10, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.action, "SETTING_UPDATED");
    }
}

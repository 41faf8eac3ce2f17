use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::activity_log::{self, ActiveModel, Entity as ActivityLog};
use crate::types::db::user;
use crate::types::internal::audit::ActivityEntry;

/// ActivityLogStore persists the audit trail
///
/// The log lives in the main database so it can be joined with users.
pub struct ActivityLogStore {}

impl ActivityLogStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        entry: ActivityEntry,
    ) -> Result<activity_log::Model, InternalError> {
        let details = if entry.details.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&entry.details)
                    .map_err(|e| AuditError::DetailsEncoding(e.to_string()))?,
            )
        };

        let row = ActiveModel {
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            details: Set(details),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        row.insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_activity_log", e))
    }

    /// Most recent entries with the acting user, if any
    pub async fn list_recent(
        &self,
        conn: &impl ConnectionTrait,
        limit: u64,
        action: Option<&str>,
    ) -> Result<Vec<(activity_log::Model, Option<user::Model>)>, InternalError> {
        let mut query = ActivityLog::find().find_also_related(user::Entity);
        if let Some(action) = action {
            query = query.filter(activity_log::Column::Action.eq(action));
        }

        query
            .order_by_desc(activity_log::Column::CreatedAt)
            .order_by_desc(activity_log::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_activity_logs", e))
    }
}

impl Default for ActivityLogStore {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::SettingsError;
use crate::types::db::warning::{self, ActiveModel, Entity as Warning};

/// WarningStore manages storefront notices
pub struct WarningStore {}

impl WarningStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn list_active(&self, conn: &impl ConnectionTrait) -> Result<Vec<warning::Model>, InternalError> {
        Warning::find()
            .filter(warning::Column::IsActive.eq(true))
            .order_by_desc(warning::Column::CreatedAt)
            .order_by_desc(warning::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_warnings", e))
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<warning::Model>, InternalError> {
        Warning::find()
            .order_by_desc(warning::Column::CreatedAt)
            .order_by_desc(warning::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_warnings", e))
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        message: String,
        is_active: bool,
        created_by: Option<i32>,
    ) -> Result<warning::Model, InternalError> {
        let row = ActiveModel {
            message: Set(message),
            is_active: Set(is_active),
            created_by: Set(created_by),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        row.insert(conn)
            .await
            .map_err(|e| InternalError::database("create_warning", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        warning_id: i32,
        message: Option<String>,
        is_active: Option<bool>,
    ) -> Result<warning::Model, InternalError> {
        let existing = Warning::find_by_id(warning_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_warning", e))?
            .ok_or(SettingsError::WarningNotFound(warning_id))?;

        let mut active: ActiveModel = existing.into();
        if let Some(message) = message {
            active.message = Set(message);
        }
        if let Some(is_active) = is_active {
            active.is_active = Set(is_active);
        }

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_warning", e))
    }
}

impl Default for WarningStore {
    fn default() -> Self {
        Self::new()
    }
}

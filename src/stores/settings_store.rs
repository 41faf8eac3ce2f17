use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::system_setting::{self, ActiveModel, Entity as SystemSetting};

/// SettingsStore is a key/value table of JSON-encoded values
pub struct SettingsStore {}

impl SettingsStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn get(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
    ) -> Result<Option<system_setting::Model>, InternalError> {
        SystemSetting::find()
            .filter(system_setting::Column::Key.eq(key))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_setting", e))
    }

    /// Insert or replace a setting value
    pub async fn upsert(
        &self,
        conn: &impl ConnectionTrait,
        key: &str,
        value: &serde_json::Value,
        updated_by: Option<i32>,
    ) -> Result<system_setting::Model, InternalError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| InternalError::parse("setting_value", e.to_string()))?;

        let row = ActiveModel {
            key: Set(key.to_string()),
            value: Set(encoded),
            updated_at: Set(Utc::now().timestamp()),
            updated_by: Set(updated_by),
            ..Default::default()
        };

        SystemSetting::insert(row)
            .on_conflict(
                OnConflict::column(system_setting::Column::Key)
                    .update_columns([
                        system_setting::Column::Value,
                        system_setting::Column::UpdatedAt,
                        system_setting::Column::UpdatedBy,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("upsert_setting", e))?;

        self.get(conn, key).await?.ok_or_else(|| {
            InternalError::database(
                "upsert_setting",
                sea_orm::DbErr::RecordNotFound(format!("setting {} missing after upsert", key)),
            )
        })
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

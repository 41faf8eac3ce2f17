use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::types::db::{system_setting, warning};
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::context::RequestContext;

/// Key under which the storefront PIX key is stored
pub const PIX_KEY_SETTING: &str = "pixKey";

/// Orchestrates system settings and storefront warnings
pub struct SettingsCoordinator {
    app_data: Arc<AppData>,
}

fn validate_message(message: &str) -> Result<String, InternalError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(InternalError::validation("message", "must not be empty"));
    }
    Ok(message.to_string())
}

impl SettingsCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// Look up a setting; a missing key is not an error
    pub async fn get_setting(&self, key: &str) -> Result<Option<system_setting::Model>, InternalError> {
        self.app_data.settings_store.get(&self.app_data.db, key).await
    }

    pub async fn upsert_setting(
        &self,
        ctx: &RequestContext,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<system_setting::Model, InternalError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(InternalError::validation("key", "must not be empty"));
        }

        let setting = self
            .app_data
            .settings_store
            .upsert(&self.app_data.db, key, value, ctx.user_id())
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::SettingUpdated)
            .with_context(ctx)
            .add_field("key", key)
            .write()
            .await
        {
            tracing::error!("Failed to log setting update: {:?}", audit_err);
        }

        Ok(setting)
    }

    pub async fn list_active_warnings(&self) -> Result<Vec<warning::Model>, InternalError> {
        self.app_data.warning_store.list_active(&self.app_data.db).await
    }

    pub async fn list_all_warnings(&self) -> Result<Vec<warning::Model>, InternalError> {
        self.app_data.warning_store.list_all(&self.app_data.db).await
    }

    pub async fn create_warning(
        &self,
        ctx: &RequestContext,
        message: &str,
        is_active: bool,
    ) -> Result<warning::Model, InternalError> {
        let message = validate_message(message)?;
        let warning = self
            .app_data
            .warning_store
            .create(&self.app_data.db, message, is_active, ctx.user_id())
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_action(ctx, ActivityAction::WarningCreated, "warningId", warning.id)
            .await
        {
            tracing::error!("Failed to log warning creation: {:?}", audit_err);
        }

        Ok(warning)
    }

    pub async fn update_warning(
        &self,
        ctx: &RequestContext,
        warning_id: i32,
        message: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<warning::Model, InternalError> {
        let message = message.map(validate_message).transpose()?;
        let warning = self
            .app_data
            .warning_store
            .update(&self.app_data.db, warning_id, message, is_active)
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::WarningUpdated)
            .with_context(ctx)
            .add_field("warningId", warning.id)
            .add_field("isActive", warning.is_active)
            .write()
            .await
        {
            tracing::error!("Failed to log warning update: {:?}", audit_err);
        }

        Ok(warning)
    }
}

use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::{Api, BearerAuth, helpers};
use crate::app_data::AppData;
use crate::coordinators::SettingsCoordinator;
use crate::errors::StoreError;
use crate::providers::TokenProvider;
use crate::types::dto::settings::{
    SettingLookupResponse, SettingResponse, UpsertSettingRequest, WarningListResponse,
};

/// Key/value settings and storefront warnings
pub struct SettingsApi {
    settings_coordinator: SettingsCoordinator,
    token_provider: Arc<TokenProvider>,
    app_data: Arc<AppData>,
}

impl SettingsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            settings_coordinator: SettingsCoordinator::new(app_data.clone()),
            app_data,
        }
    }
}

impl Api for SettingsApi {
    fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }
}

#[derive(Tags)]
enum SettingsTags {
    /// Settings and warnings
    Settings,
}

#[OpenApi]
impl SettingsApi {
    /// Read a setting; `setting` is null for unknown keys
    #[oai(path = "/settings/:key", method = "get", tag = "SettingsTags::Settings")]
    async fn get_setting(&self, key: Path<String>) -> Result<Json<SettingLookupResponse>, StoreError> {
        let setting = self.settings_coordinator.get_setting(&key.0).await?;

        Ok(Json(SettingLookupResponse {
            setting: setting.map(Into::into),
        }))
    }

    /// Create or replace a setting
    #[oai(path = "/settings", method = "post", tag = "SettingsTags::Settings")]
    async fn upsert_setting(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<UpsertSettingRequest>,
    ) -> Result<Json<SettingResponse>, StoreError> {
        let ctx = self.request_context(req, Some(&auth))?;
        let ctx = helpers::refresh_account(ctx, &self.app_data).await?;
        if !ctx.is_staff() {
            return Err(StoreError::admin_required());
        }

        let setting = self
            .settings_coordinator
            .upsert_setting(&ctx, &body.key, &body.value)
            .await?;

        Ok(Json(SettingResponse {
            setting: setting.into(),
        }))
    }

    /// Active storefront warnings, newest first
    #[oai(path = "/warnings", method = "get", tag = "SettingsTags::Settings")]
    async fn list_warnings(&self) -> Result<Json<WarningListResponse>, StoreError> {
        let warnings = self.settings_coordinator.list_active_warnings().await?;

        Ok(Json(WarningListResponse {
            warnings: warnings.into_iter().map(Into::into).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{bearer_for, create_test_user, setup_test_app_data};
    use crate::types::db::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_key_reads_as_null() {
        let (app_data, _dir) = setup_test_app_data().await;
        let api = SettingsApi::new(app_data);

        let response = api.get_setting(Path("missing".to_string())).await.unwrap();

        assert!(response.setting.is_none());
    }

    #[tokio::test]
    async fn test_admin_upsert_then_read() {
        let (app_data, _dir) = setup_test_app_data().await;
        let admin = create_test_user(&app_data.db, "boss", Role::Admin).await;
        let req = Request::builder().finish();
        let api = SettingsApi::new(app_data.clone());

        let body = || {
            Json(UpsertSettingRequest {
                key: "pixKey".to_string(),
                value: json!("store@example.com"),
            })
        };
        api.upsert_setting(&req, bearer_for(&app_data, &admin), body())
            .await
            .unwrap();
        api.upsert_setting(&req, bearer_for(&app_data, &admin), body())
            .await
            .unwrap();

        let response = api.get_setting(Path("pixKey".to_string())).await.unwrap();
        let setting = response.setting.as_ref().unwrap();
        assert_eq!(setting.value, json!("store@example.com"));
        assert_eq!(setting.updated_by, Some(admin.id));
    }

    #[tokio::test]
    async fn test_customer_cannot_upsert() {
        let (app_data, _dir) = setup_test_app_data().await;
        let customer = create_test_user(&app_data.db, "customer", Role::User).await;
        let req = Request::builder().finish();
        let api = SettingsApi::new(app_data.clone());

        let err = api
            .upsert_setting(
                &req,
                bearer_for(&app_data, &customer),
                Json(UpsertSettingRequest {
                    key: "pixKey".to_string(),
                    value: json!("x"),
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Forbidden(_)));
    }
}

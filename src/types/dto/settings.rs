use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{system_setting, warning};

#[derive(Object, Debug, Clone, PartialEq)]
pub struct SettingDto {
    pub id: i32,
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: i64,
    pub updated_by: Option<i32>,
}

impl From<system_setting::Model> for SettingDto {
    fn from(model: system_setting::Model) -> Self {
        // Rows written outside the API may hold a bare string
        let value = serde_json::from_str(&model.value)
            .unwrap_or(serde_json::Value::String(model.value));

        Self {
            id: model.id,
            key: model.key,
            value,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        }
    }
}

/// Lookup result; `setting` is null when the key was never written
#[derive(Object, Debug)]
pub struct SettingLookupResponse {
    pub setting: Option<SettingDto>,
}

#[derive(Object, Debug)]
pub struct SettingResponse {
    pub setting: SettingDto,
}

#[derive(Object, Debug)]
pub struct UpsertSettingRequest {
    #[oai(validator(min_length = 1, max_length = 100))]
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Object, Debug, Clone, PartialEq)]
pub struct WarningDto {
    pub id: i32,
    pub message: String,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: i64,
}

impl From<warning::Model> for WarningDto {
    fn from(model: warning::Model) -> Self {
        Self {
            id: model.id,
            message: model.message,
            is_active: model.is_active,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct WarningListResponse {
    pub warnings: Vec<WarningDto>,
}

#[derive(Object, Debug)]
pub struct WarningResponse {
    pub warning: WarningDto,
}

#[derive(Object, Debug)]
pub struct CreateWarningRequest {
    #[oai(validator(min_length = 1, max_length = 1000))]
    pub message: String,

    /// Defaults to true
    pub is_active: Option<bool>,
}

#[derive(Object, Debug)]
pub struct UpdateWarningRequest {
    pub message: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(ApiResponse, Debug)]
pub enum CreateWarningApiResponse {
    /// Warning created
    #[oai(status = 201)]
    Created(Json<WarningResponse>),
}

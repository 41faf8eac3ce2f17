use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{ReviewStatus, Role, activity_log, admin_request};
use crate::types::dto::auth::{UserDto, UserSummary};

#[derive(Object, Debug, Clone, PartialEq)]
pub struct AdminRequestDto {
    pub id: i32,
    pub user_id: i32,
    pub requested_role: Role,
    pub status: ReviewStatus,
    pub approved_by: Option<i32>,
    pub created_at: i64,
    pub processed_at: Option<i64>,
}

impl From<admin_request::Model> for AdminRequestDto {
    fn from(model: admin_request::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            requested_role: model.requested_role,
            status: model.status,
            approved_by: model.approved_by,
            created_at: model.created_at,
            processed_at: model.processed_at,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct AdminRequestDetailsDto {
    #[oai(flatten)]
    pub request: AdminRequestDto,
    pub user: UserSummary,
}

#[derive(Object, Debug)]
pub struct AdminRequestResponse {
    pub request: AdminRequestDto,
}

#[derive(Object, Debug)]
pub struct AdminRequestListResponse {
    pub requests: Vec<AdminRequestDetailsDto>,
}

#[derive(Object, Debug)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
}

#[derive(Object, Debug)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Object, Debug)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Object, Debug, Clone)]
pub struct ActivityLogDto {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: String,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,

    /// Acting user, when the row is attributed to one
    pub user: Option<UserSummary>,
}

impl ActivityLogDto {
    pub fn from_row(model: activity_log::Model, user: Option<UserSummary>) -> Self {
        let details = model
            .details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());

        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            details,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            created_at: model.created_at,
            user,
        }
    }
}

#[derive(Object, Debug)]
pub struct ActivityLogListResponse {
    pub logs: Vec<ActivityLogDto>,
}

/// Accounts and settings touched by an init/bootstrap run
#[derive(Object, Debug)]
pub struct InitResponse {
    pub created: Vec<String>,
}

#[derive(ApiResponse, Debug)]
pub enum RequestAdminApiResponse {
    /// Request filed and pending owner review
    #[oai(status = 201)]
    Created(Json<AdminRequestResponse>),
}

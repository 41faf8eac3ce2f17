use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{Role, user};

/// Request model for user login
#[derive(Object, Debug)]
pub struct LoginRequest {
    /// Username (case-insensitive)
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Request model for account registration
#[derive(Object, Debug)]
pub struct RegisterRequest {
    #[oai(validator(max_length = 64))]
    pub username: String,

    #[oai(validator(max_length = 256))]
    pub password: String,
}

/// Public view of a user; never carries the password hash
#[derive(Object, Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
    pub ip_address: Option<String>,
}

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            is_active: model.is_active,
            created_at: model.created_at,
            last_login_at: model.last_login_at,
            ip_address: model.ip_address,
        }
    }
}

/// Compact user reference embedded in joined listings
#[derive(Object, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
        }
    }
}

/// Response model for a successful login
#[derive(Object, Debug)]
pub struct LoginResponse {
    pub user: UserDto,

    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Single user wrapper
#[derive(Object, Debug)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(ApiResponse, Debug)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}

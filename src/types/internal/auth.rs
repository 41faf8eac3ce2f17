use serde::{Deserialize, Serialize};

use crate::types::db::Role;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    /// Role at the time the token was issued
    pub role: Role,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,
}

impl Claims {
    /// Numeric user id carried in `sub`
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

use thiserror::Error;

use crate::types::db::Role;

/// User management and admin-request failures
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("User already has elevated role: {0:?}")]
    AlreadyElevated(Role),

    #[error("User {0} already has a pending admin request")]
    RequestAlreadyPending(i32),

    #[error("Admin request not found: {0}")]
    RequestNotFound(i32),

    #[error("Cannot modify your own account")]
    SelfModificationDenied,

    #[error("Owner accounts cannot be granted or modified")]
    OwnerImmutable,
}

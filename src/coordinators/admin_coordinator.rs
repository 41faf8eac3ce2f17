use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::{AccountError, CredentialError};
use crate::types::db::{ReviewStatus, Role, activity_log, admin_request, user};
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::context::RequestContext;

/// Default and maximum number of activity log rows returned
pub const DEFAULT_LOG_LIMIT: u64 = 100;
pub const MAX_LOG_LIMIT: u64 = 1000;

/// Orchestrates admin requests, user management and the activity log
///
/// Role checks happen in the API layer; the acting user here is whoever the
/// context says it is.
pub struct AdminCoordinator {
    app_data: Arc<AppData>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// File a request for the admin role
    pub async fn request_admin(&self, ctx: &RequestContext) -> Result<admin_request::Model, InternalError> {
        let user_id = ctx.user_id().ok_or(CredentialError::MissingAuthentication)?;
        let db = &self.app_data.db;

        let user = self.app_data.user_store.get_by_id(db, user_id).await?;
        if user.role != Role::User {
            return Err(AccountError::AlreadyElevated(user.role).into());
        }

        if self
            .app_data
            .admin_request_store
            .find_pending_for_user(db, user_id)
            .await?
            .is_some()
        {
            return Err(AccountError::RequestAlreadyPending(user_id).into());
        }

        let request = self
            .app_data
            .admin_request_store
            .create(db, user_id, Role::Admin)
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_action(ctx, ActivityAction::AdminRequestCreated, "requestId", request.id)
            .await
        {
            tracing::error!("Failed to log admin request: {:?}", audit_err);
        }

        Ok(request)
    }

    pub async fn list_pending_requests(&self) -> Result<Vec<(admin_request::Model, user::Model)>, InternalError> {
        self.app_data.admin_request_store.list_pending(&self.app_data.db).await
    }

    /// Approve a request and promote its user, atomically
    ///
    /// The status is overwritten whatever it was; the role update always runs.
    pub async fn approve_request(
        &self,
        ctx: &RequestContext,
        request_id: i32,
    ) -> Result<admin_request::Model, InternalError> {
        let txn = begin_transaction(&self.app_data.db).await?;

        let request = self.app_data.admin_request_store.get_by_id(&txn, request_id).await?;
        let requested_role = request.requested_role;
        let request = self
            .app_data
            .admin_request_store
            .review(&txn, request, ReviewStatus::Approved, ctx.user_id())
            .await?;
        self.app_data
            .user_store
            .update_role(&txn, request.user_id, requested_role)
            .await?;

        commit_transaction(txn).await?;

        tracing::info!("Admin request {} approved, user {} promoted", request.id, request.user_id);

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::AdminRequestApproved)
            .with_context(ctx)
            .add_field("requestId", request.id)
            .add_field("newAdminUserId", request.user_id)
            .write()
            .await
        {
            tracing::error!("Failed to log admin request approval: {:?}", audit_err);
        }

        Ok(request)
    }

    pub async fn reject_request(
        &self,
        ctx: &RequestContext,
        request_id: i32,
    ) -> Result<admin_request::Model, InternalError> {
        let db = &self.app_data.db;
        let request = self.app_data.admin_request_store.get_by_id(db, request_id).await?;
        let request = self
            .app_data
            .admin_request_store
            .review(db, request, ReviewStatus::Rejected, ctx.user_id())
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_action(ctx, ActivityAction::AdminRequestRejected, "requestId", request.id)
            .await
        {
            tracing::error!("Failed to log admin request rejection: {:?}", audit_err);
        }

        Ok(request)
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, InternalError> {
        self.app_data.user_store.list_users(&self.app_data.db).await
    }

    /// Promote or demote a user between `user` and `admin`
    ///
    /// Takes effect on the target's next login.
    pub async fn change_user_role(
        &self,
        ctx: &RequestContext,
        target_user_id: i32,
        new_role: Role,
    ) -> Result<user::Model, InternalError> {
        if ctx.user_id() == Some(target_user_id) {
            return Err(AccountError::SelfModificationDenied.into());
        }
        if new_role == Role::Owner {
            return Err(AccountError::OwnerImmutable.into());
        }

        let db = &self.app_data.db;
        let target = self.app_data.user_store.get_by_id(db, target_user_id).await?;
        if target.role == Role::Owner {
            return Err(AccountError::OwnerImmutable.into());
        }

        let old_role = target.role;
        let updated = self.app_data.user_store.update_role(db, target.id, new_role).await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::UserRoleChanged)
            .with_context(ctx)
            .add_field("targetUserId", updated.id)
            .add_field("oldRole", old_role)
            .add_field("newRole", new_role)
            .write()
            .await
        {
            tracing::error!("Failed to log role change: {:?}", audit_err);
        }

        Ok(updated)
    }

    /// Activate or deactivate an account; inactive accounts cannot log in
    pub async fn set_user_active(
        &self,
        ctx: &RequestContext,
        target_user_id: i32,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        if ctx.user_id() == Some(target_user_id) {
            return Err(AccountError::SelfModificationDenied.into());
        }

        let db = &self.app_data.db;
        let target = self.app_data.user_store.get_by_id(db, target_user_id).await?;
        if target.role == Role::Owner {
            return Err(AccountError::OwnerImmutable.into());
        }

        let updated = self.app_data.user_store.set_active(db, target.id, is_active).await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::UserStatusChanged)
            .with_context(ctx)
            .add_field("targetUserId", updated.id)
            .add_field("isActive", is_active)
            .write()
            .await
        {
            tracing::error!("Failed to log status change: {:?}", audit_err);
        }

        Ok(updated)
    }

    /// Most recent activity, newest first
    ///
    /// `limit` defaults to 100 and is clamped to 1..=1000.
    pub async fn list_activity_logs(
        &self,
        limit: Option<u64>,
        action: Option<&str>,
    ) -> Result<Vec<(activity_log::Model, Option<user::Model>)>, InternalError> {
        let limit = clamp_log_limit(limit);
        self.app_data
            .activity_log_store
            .list_recent(&self.app_data.db, limit, action)
            .await
    }
}

pub fn clamp_log_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
}

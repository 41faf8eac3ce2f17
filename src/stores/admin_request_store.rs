use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::types::db::admin_request::{self, ActiveModel, Entity as AdminRequest};
use crate::types::db::{ReviewStatus, Role, user};

/// AdminRequestStore manages requests for elevated access
pub struct AdminRequestStore {}

impl AdminRequestStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        requested_role: Role,
    ) -> Result<admin_request::Model, InternalError> {
        let request = ActiveModel {
            user_id: Set(user_id),
            requested_role: Set(requested_role),
            status: Set(ReviewStatus::Pending),
            approved_by: Set(None),
            created_at: Set(Utc::now().timestamp()),
            processed_at: Set(None),
            ..Default::default()
        };

        request
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_admin_request", e))
    }

    pub async fn find_pending_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<admin_request::Model>, InternalError> {
        AdminRequest::find()
            .filter(admin_request::Column::UserId.eq(user_id))
            .filter(admin_request::Column::Status.eq(ReviewStatus::Pending))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_pending_admin_request", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        request_id: i32,
    ) -> Result<admin_request::Model, InternalError> {
        AdminRequest::find_by_id(request_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_admin_request", e))?
            .ok_or_else(|| AccountError::RequestNotFound(request_id).into())
    }

    /// Pending requests joined with the requesting user, newest first
    pub async fn list_pending(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(admin_request::Model, user::Model)>, InternalError> {
        let rows = AdminRequest::find()
            .find_also_related(user::Entity)
            .filter(admin_request::Column::Status.eq(ReviewStatus::Pending))
            .order_by_desc(admin_request::Column::CreatedAt)
            .order_by_desc(admin_request::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_pending_admin_requests", e))?;

        Ok(rows
            .into_iter()
            .filter_map(|(request, user)| user.map(|user| (request, user)))
            .collect())
    }

    /// Record a decision on a request
    pub async fn review(
        &self,
        conn: &impl ConnectionTrait,
        request: admin_request::Model,
        status: ReviewStatus,
        reviewer_id: Option<i32>,
    ) -> Result<admin_request::Model, InternalError> {
        let mut active: ActiveModel = request.into();
        active.status = Set(status);
        active.approved_by = Set(reviewer_id);
        active.processed_at = Set(Some(Utc::now().timestamp()));

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("review_admin_request", e))
    }
}

impl Default for AdminRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_pending_lookup_ignores_processed_requests() {
        let db = setup_test_db().await;
        let user = create_test_user(&db, "hopeful", Role::User).await;
        let store = AdminRequestStore::new();

        let request = store.create(&db, user.id, Role::Admin).await.unwrap();
        assert!(store.find_pending_for_user(&db, user.id).await.unwrap().is_some());

        store
            .review(&db, request, ReviewStatus::Rejected, None)
            .await
            .unwrap();

        assert!(store.find_pending_for_user(&db, user.id).await.unwrap().is_none());
        assert!(store.list_pending(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_pending_includes_user() {
        let db = setup_test_db().await;
        let user = create_test_user(&db, "hopeful", Role::User).await;
        let store = AdminRequestStore::new();
        store.create(&db, user.id, Role::Admin).await.unwrap();

        let pending = store.list_pending(&db).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1.username, "hopeful");
        assert_eq!(pending[0].0.requested_role, Role::Admin);
    }

    #[tokio::test]
    async fn test_get_missing_request() {
        let db = setup_test_db().await;
        let err = AdminRequestStore::new().get_by_id(&db, 9).await.unwrap_err();

        assert!(matches!(err, InternalError::Account(AccountError::RequestNotFound(9))));
    }
}

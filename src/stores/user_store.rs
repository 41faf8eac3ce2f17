use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::{AccountError, CredentialError};
use crate::types::db::Role;
use crate::types::db::user::{self, ActiveModel, Entity as User};

/// UserStore manages account rows
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a new account
    ///
    /// The username must already be normalized. A unique-constraint violation is
    /// reported as `DuplicateUsername`, so a lost registration race looks the
    /// same as a pre-checked duplicate.
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password_hash: String,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let new_user = ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(Utc::now().timestamp()),
            last_login_at: Set(None),
            ip_address: Set(None),
            ..Default::default()
        };

        new_user.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CredentialError::DuplicateUsername(username.to_string()).into()
            }
            _ => InternalError::database("create_user", e),
        })
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Like `find_by_id`, but a missing row is `AccountError::UserNotFound`
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| AccountError::UserNotFound(user_id).into())
    }

    /// Stamp a successful login with time and client address
    pub async fn record_login(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        ip_address: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let mut active: ActiveModel = user.into();
        active.last_login_at = Set(Some(Utc::now().timestamp()));
        active.ip_address = Set(ip_address);

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("record_login", e))
    }

    pub async fn update_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let user = self.get_by_id(conn, user_id).await?;

        let mut active: ActiveModel = user.into();
        active.role = Set(role);

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user_role", e))
    }

    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let user = self.get_by_id(conn, user_id).await?;

        let mut active: ActiveModel = user.into();
        active.is_active = Set(is_active);

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))
    }

    /// All accounts, newest first
    pub async fn list_users(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn count_users(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        use sea_orm::PaginatorTrait;

        User::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let created = store
            .create_user(&db, "alice", "hash".to_string(), Role::User)
            .await
            .unwrap();

        let found = store.find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::User);
        assert!(found.is_active);
        assert!(found.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_credential_error() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.create_user(&db, "alice", "hash".to_string(), Role::User).await.unwrap();
        let err = store
            .create_user(&db, "alice", "other".to_string(), Role::User)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::DuplicateUsername(ref name)) if name == "alice"
        ));
        assert_eq!(store.count_users(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_login_sets_timestamp_and_ip() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = store.create_user(&db, "bob", "hash".to_string(), Role::User).await.unwrap();

        let updated = store
            .record_login(&db, user, Some("10.0.0.7".to_string()))
            .await
            .unwrap();

        assert!(updated.last_login_at.is_some());
        assert_eq!(updated.ip_address.as_deref(), Some("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_get_by_id_missing_user() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let err = store.get_by_id(&db, 999).await.unwrap_err();
        assert!(matches!(err, InternalError::Account(AccountError::UserNotFound(999))));
    }

    #[tokio::test]
    async fn test_update_role_and_active_flag() {
        let db = setup_test_db().await;
        let store = UserStore::new();
        let user = store.create_user(&db, "carol", "hash".to_string(), Role::User).await.unwrap();

        let promoted = store.update_role(&db, user.id, Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);

        let disabled = store.set_active(&db, user.id, false).await.unwrap();
        assert!(!disabled.is_active);
    }
}

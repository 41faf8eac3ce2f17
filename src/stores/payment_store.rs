use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::PaymentError;
use crate::types::db::payment::{self, ActiveModel, Entity as Payment};
use crate::types::db::{ReviewStatus, product, user};

/// A payment with its payer and product
pub type PaymentWithDetails = (payment::Model, user::Model, product::Model);

/// PaymentStore manages payment rows and their review state
pub struct PaymentStore {}

impl PaymentStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Record a new pending payment
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        product_id: i32,
        amount_cents: i64,
    ) -> Result<payment::Model, InternalError> {
        let new_payment = ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            amount_cents: Set(amount_cents),
            status: Set(ReviewStatus::Pending),
            proof_image_url: Set(None),
            rejection_reason: Set(None),
            approved_by: Set(None),
            created_at: Set(Utc::now().timestamp()),
            processed_at: Set(None),
            ..Default::default()
        };

        new_payment
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_payment", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        payment_id: i32,
    ) -> Result<Option<payment::Model>, InternalError> {
        Payment::find_by_id(payment_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_payment", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        payment_id: i32,
    ) -> Result<payment::Model, InternalError> {
        self.find_by_id(conn, payment_id)
            .await?
            .ok_or_else(|| PaymentError::PaymentNotFound(payment_id).into())
    }

    /// Attach the proof URL; status and processing time are left alone
    pub async fn set_proof(
        &self,
        conn: &impl ConnectionTrait,
        payment: payment::Model,
        proof_image_url: String,
    ) -> Result<payment::Model, InternalError> {
        let mut active: ActiveModel = payment.into();
        active.proof_image_url = Set(Some(proof_image_url));

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_payment_proof", e))
    }

    /// Record a review decision
    ///
    /// Unconditional: whatever the current status, the decision, reviewer and
    /// `processed_at` are overwritten.
    pub async fn review(
        &self,
        conn: &impl ConnectionTrait,
        payment_id: i32,
        status: ReviewStatus,
        reviewer_id: Option<i32>,
        rejection_reason: Option<String>,
    ) -> Result<payment::Model, InternalError> {
        let payment = self.get_by_id(conn, payment_id).await?;

        let mut active: ActiveModel = payment.into();
        active.status = Set(status);
        active.approved_by = Set(reviewer_id);
        active.rejection_reason = Set(rejection_reason);
        active.processed_at = Set(Some(Utc::now().timestamp()));

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("review_payment", e))
    }

    /// Pending payments with payer and product, newest first
    pub async fn list_pending(&self, conn: &impl ConnectionTrait) -> Result<Vec<PaymentWithDetails>, InternalError> {
        let rows = Payment::find()
            .find_also_related(user::Entity)
            .filter(payment::Column::Status.eq(ReviewStatus::Pending))
            .order_by_desc(payment::Column::CreatedAt)
            .order_by_desc(payment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_pending_payments", e))?;

        self.attach_products(conn, rows).await
    }

    /// Reviewed payments, most recently processed first
    pub async fn list_history(&self, conn: &impl ConnectionTrait) -> Result<Vec<PaymentWithDetails>, InternalError> {
        let rows = Payment::find()
            .find_also_related(user::Entity)
            .filter(payment::Column::Status.ne(ReviewStatus::Pending))
            .order_by_desc(payment::Column::ProcessedAt)
            .order_by_desc(payment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_payment_history", e))?;

        self.attach_products(conn, rows).await
    }

    pub async fn list_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<payment::Model>, InternalError> {
        Payment::find()
            .filter(payment::Column::UserId.eq(user_id))
            .order_by_desc(payment::Column::CreatedAt)
            .order_by_desc(payment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_payments", e))
    }

    pub async fn count_for_product(
        &self,
        conn: &impl ConnectionTrait,
        product_id: i32,
    ) -> Result<u64, InternalError> {
        Payment::find()
            .filter(payment::Column::ProductId.eq(product_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_product_payments", e))
    }

    // Inner-join semantics: rows whose user or product is gone are dropped
    async fn attach_products(
        &self,
        conn: &impl ConnectionTrait,
        rows: Vec<(payment::Model, Option<user::Model>)>,
    ) -> Result<Vec<PaymentWithDetails>, InternalError> {
        let product_ids: Vec<i32> = rows.iter().map(|(payment, _)| payment.product_id).collect();

        let products: HashMap<i32, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_payment_products", e))?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(payment, user)| {
                let user = user?;
                let product = products.get(&payment.product_id)?.clone();
                Some((payment, user, product))
            })
            .collect())
    }
}

impl Default for PaymentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_product, create_test_user, setup_test_db};
    use crate::types::db::Role;

    #[tokio::test]
    async fn test_new_payment_is_pending() {
        let db = setup_test_db().await;
        let buyer = create_test_user(&db, "buyer", Role::User).await;
        let product = create_test_product(&db, "Skin", 2500).await;
        let store = PaymentStore::new();

        let payment = store.create(&db, buyer.id, product.id, 2500).await.unwrap();

        assert_eq!(payment.status, ReviewStatus::Pending);
        assert!(payment.processed_at.is_none());
        assert!(payment.approved_by.is_none());
    }

    #[tokio::test]
    async fn test_pending_and_history_split() {
        let db = setup_test_db().await;
        let buyer = create_test_user(&db, "buyer", Role::User).await;
        let admin = create_test_user(&db, "staff", Role::Admin).await;
        let product = create_test_product(&db, "Skin", 2500).await;
        let store = PaymentStore::new();

        let first = store.create(&db, buyer.id, product.id, 2500).await.unwrap();
        let second = store.create(&db, buyer.id, product.id, 2500).await.unwrap();
        store
            .review(&db, first.id, ReviewStatus::Rejected, Some(admin.id), Some("blurry".to_string()))
            .await
            .unwrap();

        let pending = store.list_pending(&db).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0.id, second.id);
        assert_eq!(pending[0].1.username, "buyer");
        assert_eq!(pending[0].2.name, "Skin");

        let history = store.list_history(&db).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].0.rejection_reason.as_deref(), Some("blurry"));
    }

    #[tokio::test]
    async fn test_review_missing_payment() {
        let db = setup_test_db().await;
        let store = PaymentStore::new();

        let err = store
            .review(&db, 77, ReviewStatus::Approved, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Payment(PaymentError::PaymentNotFound(77))));
    }

    #[tokio::test]
    async fn test_set_proof_keeps_status() {
        let db = setup_test_db().await;
        let buyer = create_test_user(&db, "buyer", Role::User).await;
        let product = create_test_product(&db, "Skin", 2500).await;
        let store = PaymentStore::new();
        let payment = store.create(&db, buyer.id, product.id, 2500).await.unwrap();

        let updated = store
            .set_proof(&db, payment, "/uploads/proof.png".to_string())
            .await
            .unwrap();

        assert_eq!(updated.proof_image_url.as_deref(), Some("/uploads/proof.png"));
        assert_eq!(updated.status, ReviewStatus::Pending);
        assert!(updated.processed_at.is_none());
        assert_eq!(store.count_for_product(&db, product.id).await.unwrap(), 1);
    }
}

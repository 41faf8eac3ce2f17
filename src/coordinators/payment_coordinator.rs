use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{CatalogError, CredentialError, PaymentError, UploadError};
use crate::stores::payment_store::PaymentWithDetails;
use crate::types::db::{ReviewStatus, payment};
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::context::RequestContext;
use crate::types::internal::upload::IncomingFile;

/// Orchestrates the manual PIX payment workflow
pub struct PaymentCoordinator {
    app_data: Arc<AppData>,
}

impl PaymentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// Open a pending payment for an active product at its current price
    pub async fn create_payment(&self, ctx: &RequestContext, product_id: i32) -> Result<payment::Model, InternalError> {
        let user_id = ctx.user_id().ok_or(CredentialError::MissingAuthentication)?;
        let db = &self.app_data.db;

        let product = match self.app_data.product_store.find_by_id(db, product_id).await? {
            Some(product) if product.is_active => product,
            _ => return Err(CatalogError::ProductNotFound(product_id).into()),
        };

        let payment = self
            .app_data
            .payment_store
            .create(db, user_id, product.id, product.price_cents)
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::PaymentCreated)
            .with_context(ctx)
            .add_field("paymentId", payment.id)
            .add_field("productId", product.id)
            .add_field("amount", payment.amount_cents)
            .write()
            .await
        {
            tracing::error!("Failed to log payment creation: {:?}", audit_err);
        }

        Ok(payment)
    }

    /// Store a proof file and attach it to the payment
    ///
    /// Owners of the payment and staff may upload. The status is not touched.
    pub async fn upload_proof(
        &self,
        ctx: &RequestContext,
        payment_id: i32,
        file: Option<IncomingFile>,
    ) -> Result<payment::Model, InternalError> {
        let file = file.ok_or(UploadError::MissingFile)?;
        let db = &self.app_data.db;

        let payment = self.app_data.payment_store.get_by_id(db, payment_id).await?;
        if ctx.user_id() != Some(payment.user_id) && !ctx.is_staff() {
            return Err(PaymentError::NotPaymentOwner(payment.id).into());
        }

        let stored = self.app_data.upload_provider.store_proof(file).await?;
        let payment = self
            .app_data
            .payment_store
            .set_proof(db, payment, stored.public_url.clone())
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::PaymentProofUploaded)
            .with_context(ctx)
            .add_field("paymentId", payment.id)
            .add_field("filename", &stored.stored_name)
            .add_field("sha256", &stored.sha256)
            .write()
            .await
        {
            tracing::error!("Failed to log proof upload: {:?}", audit_err);
        }

        Ok(payment)
    }

    pub async fn list_pending(&self) -> Result<Vec<PaymentWithDetails>, InternalError> {
        self.app_data.payment_store.list_pending(&self.app_data.db).await
    }

    pub async fn list_history(&self) -> Result<Vec<PaymentWithDetails>, InternalError> {
        self.app_data.payment_store.list_history(&self.app_data.db).await
    }

    /// The caller's own payments, newest first
    pub async fn list_my_payments(&self, ctx: &RequestContext) -> Result<Vec<payment::Model>, InternalError> {
        let user_id = ctx.user_id().ok_or(CredentialError::MissingAuthentication)?;
        self.app_data.payment_store.list_for_user(&self.app_data.db, user_id).await
    }

    /// Mark a payment approved; repeating it overwrites reviewer and time
    pub async fn approve_payment(&self, ctx: &RequestContext, payment_id: i32) -> Result<payment::Model, InternalError> {
        let payment = self
            .app_data
            .payment_store
            .review(&self.app_data.db, payment_id, ReviewStatus::Approved, ctx.user_id(), None)
            .await?;

        tracing::info!("Payment {} approved", payment.id);

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_action(ctx, ActivityAction::PaymentApproved, "paymentId", payment.id)
            .await
        {
            tracing::error!("Failed to log payment approval: {:?}", audit_err);
        }

        Ok(payment)
    }

    pub async fn reject_payment(
        &self,
        ctx: &RequestContext,
        payment_id: i32,
        reason: &str,
    ) -> Result<payment::Model, InternalError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(InternalError::validation("reason", "must not be empty"));
        }

        let payment = self
            .app_data
            .payment_store
            .review(
                &self.app_data.db,
                payment_id,
                ReviewStatus::Rejected,
                ctx.user_id(),
                Some(reason.to_string()),
            )
            .await?;

        tracing::info!("Payment {} rejected", payment.id);

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::PaymentRejected)
            .with_context(ctx)
            .add_field("paymentId", payment.id)
            .add_field("reason", reason)
            .write()
            .await
        {
            tracing::error!("Failed to log payment rejection: {:?}", audit_err);
        }

        Ok(payment)
    }
}

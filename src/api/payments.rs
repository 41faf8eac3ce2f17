use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json, types::multipart::Upload};
use tokio::io::AsyncReadExt;

use crate::api::{Api, BearerAuth, helpers};
use crate::app_data::AppData;
use crate::coordinators::PaymentCoordinator;
use crate::errors::{InternalError, StoreError};
use crate::providers::TokenProvider;
use crate::types::dto::payments::{
    CreatePaymentApiResponse, CreatePaymentRequest, MyPaymentsResponse, PaymentResponse,
    UploadProofForm, UploadProofResponse,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::upload::IncomingFile;

/// Customer-facing payment endpoints
pub struct PaymentsApi {
    payment_coordinator: PaymentCoordinator,
    token_provider: Arc<TokenProvider>,
    max_upload_bytes: usize,
    app_data: Arc<AppData>,
}

impl PaymentsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            max_upload_bytes: app_data.upload_provider.max_bytes(),
            payment_coordinator: PaymentCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn account_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, StoreError> {
        let ctx = self.request_context(req, Some(auth))?;
        Ok(helpers::refresh_account(ctx, &self.app_data).await?)
    }
}

impl Api for PaymentsApi {
    fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }
}

/// Read a multipart upload into memory, at most one byte past `max_bytes`
///
/// The extra byte lets the size check see that the limit was crossed.
async fn read_upload(upload: Option<Upload>, max_bytes: usize) -> Result<Option<IncomingFile>, InternalError> {
    let Some(upload) = upload else {
        return Ok(None);
    };

    let file_name = upload.file_name().map(str::to_string);
    let content_type = upload.content_type().map(str::to_string);
    let mut bytes = Vec::with_capacity(upload.size().min(max_bytes + 1));
    upload
        .into_async_read()
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| InternalError::io("read multipart upload", e))?;

    Ok(Some(IncomingFile {
        file_name,
        content_type,
        bytes,
    }))
}

#[derive(Tags)]
enum PaymentTags {
    /// PIX payments and proof uploads
    Payments,
}

#[OpenApi]
impl PaymentsApi {
    /// Open a pending payment for an active product
    ///
    /// The amount is the product's current price.
    #[oai(path = "/payments", method = "post", tag = "PaymentTags::Payments")]
    async fn create_payment(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreatePaymentRequest>,
    ) -> Result<CreatePaymentApiResponse, StoreError> {
        let ctx = self.account_context(req, &auth).await?;
        let payment = self
            .payment_coordinator
            .create_payment(&ctx, body.product_id)
            .await?;

        Ok(CreatePaymentApiResponse::Created(Json(PaymentResponse {
            payment: payment.into(),
        })))
    }

    /// The caller's payments, newest first
    #[oai(path = "/payments/mine", method = "get", tag = "PaymentTags::Payments")]
    async fn my_payments(&self, req: &Request, auth: BearerAuth) -> Result<Json<MyPaymentsResponse>, StoreError> {
        let ctx = self.account_context(req, &auth).await?;
        let payments = self.payment_coordinator.list_my_payments(&ctx).await?;

        Ok(Json(MyPaymentsResponse {
            payments: payments.into_iter().map(Into::into).collect(),
        }))
    }

    /// Attach a receipt (jpeg, png or pdf) to a payment
    #[oai(path = "/payments/:id/upload-proof", method = "post", tag = "PaymentTags::Payments")]
    async fn upload_proof(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        form: UploadProofForm,
    ) -> Result<Json<UploadProofResponse>, StoreError> {
        let ctx = self.account_context(req, &auth).await?;
        let file = read_upload(form.proof, self.max_upload_bytes).await?;

        let payment = self.payment_coordinator.upload_proof(&ctx, id.0, file).await?;
        let proof_image_url = payment.proof_image_url.clone().unwrap_or_default();

        Ok(Json(UploadProofResponse {
            payment: payment.into(),
            proof_image_url,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{
        bearer_for, create_test_product, create_test_user, setup_test_app_data,
    };
    use crate::types::db::{ReviewStatus, Role};

    #[tokio::test]
    async fn test_create_payment_uses_product_price() {
        let (app_data, _dir) = setup_test_app_data().await;
        let buyer = create_test_user(&app_data.db, "buyer", Role::User).await;
        let product = create_test_product(&app_data.db, "Ebook", 2590).await;
        let req = Request::builder().finish();
        let api = PaymentsApi::new(app_data.clone());

        let CreatePaymentApiResponse::Created(created) = api
            .create_payment(
                &req,
                bearer_for(&app_data, &buyer),
                Json(CreatePaymentRequest { product_id: product.id }),
            )
            .await
            .unwrap();

        assert_eq!(created.payment.amount_cents, 2590);
        assert_eq!(created.payment.status, ReviewStatus::Pending);
        assert_eq!(created.payment.user_id, buyer.id);
    }

    #[tokio::test]
    async fn test_create_payment_for_missing_product() {
        let (app_data, _dir) = setup_test_app_data().await;
        let buyer = create_test_user(&app_data.db, "buyer", Role::User).await;
        let req = Request::builder().finish();
        let api = PaymentsApi::new(app_data.clone());

        let err = api
            .create_payment(
                &req,
                bearer_for(&app_data, &buyer),
                Json(CreatePaymentRequest { product_id: 404 }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_my_payments_only_lists_own() {
        let (app_data, _dir) = setup_test_app_data().await;
        let buyer = create_test_user(&app_data.db, "buyer", Role::User).await;
        let other = create_test_user(&app_data.db, "other", Role::User).await;
        let product = create_test_product(&app_data.db, "Ebook", 2590).await;
        app_data
            .payment_store
            .create(&app_data.db, other.id, product.id, 2590)
            .await
            .unwrap();
        let mine = app_data
            .payment_store
            .create(&app_data.db, buyer.id, product.id, 2590)
            .await
            .unwrap();
        let req = Request::builder().finish();
        let api = PaymentsApi::new(app_data.clone());

        let response = api.my_payments(&req, bearer_for(&app_data, &buyer)).await.unwrap();

        let ids: Vec<i32> = response.payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![mine.id]);
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        let (app_data, _dir) = setup_test_app_data().await;
        let buyer = create_test_user(&app_data.db, "buyer", Role::User).await;
        let req = Request::builder().finish();
        let api = PaymentsApi::new(app_data.clone());

        let err = api
            .upload_proof(
                &req,
                bearer_for(&app_data, &buyer),
                Path(1),
                UploadProofForm { proof: None },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::MissingFile(_)));
    }
}

use poem_openapi::{ApiResponse, Multipart, Object, payload::Json, types::multipart::Upload};

use crate::types::db::{ReviewStatus, payment};
use crate::types::dto::auth::UserSummary;
use crate::types::dto::products::ProductSummary;

#[derive(Object, Debug, Clone, PartialEq)]
pub struct PaymentDto {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub amount_cents: i64,
    pub status: ReviewStatus,
    pub proof_image_url: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<i32>,
    pub created_at: i64,
    pub processed_at: Option<i64>,
}

impl From<payment::Model> for PaymentDto {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            amount_cents: model.amount_cents,
            status: model.status,
            proof_image_url: model.proof_image_url,
            rejection_reason: model.rejection_reason,
            approved_by: model.approved_by,
            created_at: model.created_at,
            processed_at: model.processed_at,
        }
    }
}

/// Payment joined with its payer and product, for the review queue
#[derive(Object, Debug, Clone)]
pub struct PaymentDetailsDto {
    #[oai(flatten)]
    pub payment: PaymentDto,
    pub user: UserSummary,
    pub product: ProductSummary,
}

#[derive(Object, Debug)]
pub struct CreatePaymentRequest {
    pub product_id: i32,
}

#[derive(Object, Debug)]
pub struct RejectPaymentRequest {
    #[oai(validator(min_length = 1, max_length = 500))]
    pub reason: String,
}

/// Multipart body for proof uploads
#[derive(Multipart)]
pub struct UploadProofForm {
    /// Receipt image or PDF
    pub proof: Option<Upload>,
}

#[derive(Object, Debug)]
pub struct PaymentResponse {
    pub payment: PaymentDto,
}

#[derive(Object, Debug)]
pub struct UploadProofResponse {
    pub payment: PaymentDto,
    pub proof_image_url: String,
}

#[derive(Object, Debug)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentDetailsDto>,
}

#[derive(Object, Debug)]
pub struct MyPaymentsResponse {
    pub payments: Vec<PaymentDto>,
}

#[derive(ApiResponse, Debug)]
pub enum CreatePaymentApiResponse {
    /// Payment opened, awaiting proof and review
    #[oai(status = 201)]
    Created(Json<PaymentResponse>),
}

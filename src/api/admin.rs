use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::api::{Api, BearerAuth, helpers};
use crate::app_data::AppData;
use crate::coordinators::{AdminCoordinator, CatalogCoordinator, PaymentCoordinator, SettingsCoordinator};
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::stores::PaymentWithDetails;
use crate::types::dto::admin::{
    ActivityLogDto, ActivityLogListResponse, AdminRequestDetailsDto, AdminRequestListResponse,
    AdminRequestResponse, ChangeRoleRequest, SetActiveRequest, UserListResponse,
};
use crate::types::dto::auth::UserResponse;
use crate::types::dto::payments::{
    PaymentDetailsDto, PaymentListResponse, PaymentResponse, RejectPaymentRequest,
};
use crate::types::dto::products::ProductListResponse;
use crate::types::dto::settings::{
    CreateWarningApiResponse, CreateWarningRequest, UpdateWarningRequest, WarningListResponse,
    WarningResponse,
};
use crate::types::internal::context::RequestContext;

/// Back office endpoints for admins and the owner
pub struct AdminApi {
    admin_coordinator: AdminCoordinator,
    catalog_coordinator: CatalogCoordinator,
    payment_coordinator: PaymentCoordinator,
    settings_coordinator: SettingsCoordinator,
    token_provider: Arc<TokenProvider>,
    app_data: Arc<AppData>,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            admin_coordinator: AdminCoordinator::new(app_data.clone()),
            catalog_coordinator: CatalogCoordinator::new(app_data.clone()),
            payment_coordinator: PaymentCoordinator::new(app_data.clone()),
            settings_coordinator: SettingsCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn account_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AdminError> {
        let ctx = self.request_context(req, Some(auth))?;
        Ok(helpers::refresh_account(ctx, &self.app_data).await?)
    }

    async fn staff_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AdminError> {
        let ctx = self.account_context(req, auth).await?;
        if !ctx.is_staff() {
            return Err(AdminError::admin_required());
        }
        Ok(ctx)
    }

    async fn owner_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AdminError> {
        let ctx = self.account_context(req, auth).await?;
        if !ctx.is_owner() {
            return Err(AdminError::owner_required());
        }
        Ok(ctx)
    }
}

impl Api for AdminApi {
    fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }
}

fn payment_list(rows: Vec<PaymentWithDetails>) -> PaymentListResponse {
    PaymentListResponse {
        payments: rows
            .into_iter()
            .map(|(payment, user, product)| PaymentDetailsDto {
                payment: payment.into(),
                user: user.into(),
                product: product.into(),
            })
            .collect(),
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Payment review queue
    AdminPayments,
    /// Accounts, roles and admin requests
    AdminUsers,
    /// Catalog, warnings and the activity log
    AdminContent,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Every product, inactive included
    #[oai(path = "/products", method = "get", tag = "AdminTags::AdminContent")]
    async fn list_products(&self, req: &Request, auth: BearerAuth) -> Result<Json<ProductListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let products = self.catalog_coordinator.list_all_products().await?;

        Ok(Json(ProductListResponse {
            products: products.into_iter().map(Into::into).collect(),
        }))
    }

    /// Pending payments, newest first
    #[oai(path = "/payments/pending", method = "get", tag = "AdminTags::AdminPayments")]
    async fn pending_payments(&self, req: &Request, auth: BearerAuth) -> Result<Json<PaymentListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let rows = self.payment_coordinator.list_pending().await?;

        Ok(Json(payment_list(rows)))
    }

    /// Reviewed payments, most recently processed first
    #[oai(path = "/payments/history", method = "get", tag = "AdminTags::AdminPayments")]
    async fn payment_history(&self, req: &Request, auth: BearerAuth) -> Result<Json<PaymentListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let rows = self.payment_coordinator.list_history().await?;

        Ok(Json(payment_list(rows)))
    }

    #[oai(path = "/payments/:id/approve", method = "put", tag = "AdminTags::AdminPayments")]
    async fn approve_payment(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<PaymentResponse>, AdminError> {
        let ctx = self.staff_context(req, &auth).await?;
        let payment = self.payment_coordinator.approve_payment(&ctx, id.0).await?;

        Ok(Json(PaymentResponse {
            payment: payment.into(),
        }))
    }

    #[oai(path = "/payments/:id/reject", method = "put", tag = "AdminTags::AdminPayments")]
    async fn reject_payment(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<RejectPaymentRequest>,
    ) -> Result<Json<PaymentResponse>, AdminError> {
        let ctx = self.staff_context(req, &auth).await?;
        let payment = self
            .payment_coordinator
            .reject_payment(&ctx, id.0, &body.reason)
            .await?;

        Ok(Json(PaymentResponse {
            payment: payment.into(),
        }))
    }

    /// Pending admin requests
    #[oai(path = "/requests", method = "get", tag = "AdminTags::AdminUsers")]
    async fn list_requests(&self, req: &Request, auth: BearerAuth) -> Result<Json<AdminRequestListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let rows = self.admin_coordinator.list_pending_requests().await?;

        Ok(Json(AdminRequestListResponse {
            requests: rows
                .into_iter()
                .map(|(request, user)| AdminRequestDetailsDto {
                    request: request.into(),
                    user: user.into(),
                })
                .collect(),
        }))
    }

    /// Approve a request and promote the requester (owner only)
    #[oai(path = "/requests/:id/approve", method = "put", tag = "AdminTags::AdminUsers")]
    async fn approve_request(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<AdminRequestResponse>, AdminError> {
        let ctx = self.owner_context(req, &auth).await?;
        let request = self.admin_coordinator.approve_request(&ctx, id.0).await?;

        Ok(Json(AdminRequestResponse {
            request: request.into(),
        }))
    }

    /// Reject a request (owner only)
    #[oai(path = "/requests/:id/reject", method = "put", tag = "AdminTags::AdminUsers")]
    async fn reject_request(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<AdminRequestResponse>, AdminError> {
        let ctx = self.owner_context(req, &auth).await?;
        let request = self.admin_coordinator.reject_request(&ctx, id.0).await?;

        Ok(Json(AdminRequestResponse {
            request: request.into(),
        }))
    }

    #[oai(path = "/users", method = "get", tag = "AdminTags::AdminUsers")]
    async fn list_users(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let users = self.admin_coordinator.list_users().await?;

        Ok(Json(UserListResponse {
            users: users.into_iter().map(Into::into).collect(),
        }))
    }

    /// Change a user's role (owner only)
    #[oai(path = "/users/:id/role", method = "put", tag = "AdminTags::AdminUsers")]
    async fn change_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<ChangeRoleRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = self.owner_context(req, &auth).await?;
        let user = self
            .admin_coordinator
            .change_user_role(&ctx, id.0, body.role)
            .await?;

        Ok(Json(UserResponse { user: user.into() }))
    }

    /// Activate or deactivate an account (owner only)
    #[oai(path = "/users/:id/active", method = "put", tag = "AdminTags::AdminUsers")]
    async fn set_active(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = self.owner_context(req, &auth).await?;
        let user = self
            .admin_coordinator
            .set_user_active(&ctx, id.0, body.is_active)
            .await?;

        Ok(Json(UserResponse { user: user.into() }))
    }

    /// Recent activity, newest first
    ///
    /// `limit` defaults to 100 and is capped at 1000. `action` filters by
    /// exact action name.
    #[oai(path = "/logs", method = "get", tag = "AdminTags::AdminContent")]
    async fn list_logs(
        &self,
        req: &Request,
        auth: BearerAuth,
        limit: Query<Option<u64>>,
        action: Query<Option<String>>,
    ) -> Result<Json<ActivityLogListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let rows = self
            .admin_coordinator
            .list_activity_logs(limit.0, action.0.as_deref())
            .await?;

        Ok(Json(ActivityLogListResponse {
            logs: rows
                .into_iter()
                .map(|(log, user)| ActivityLogDto::from_row(log, user.map(Into::into)))
                .collect(),
        }))
    }

    /// All warnings, inactive included
    #[oai(path = "/warnings", method = "get", tag = "AdminTags::AdminContent")]
    async fn list_warnings(&self, req: &Request, auth: BearerAuth) -> Result<Json<WarningListResponse>, AdminError> {
        self.staff_context(req, &auth).await?;
        let warnings = self.settings_coordinator.list_all_warnings().await?;

        Ok(Json(WarningListResponse {
            warnings: warnings.into_iter().map(Into::into).collect(),
        }))
    }

    #[oai(path = "/warnings", method = "post", tag = "AdminTags::AdminContent")]
    async fn create_warning(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateWarningRequest>,
    ) -> Result<CreateWarningApiResponse, AdminError> {
        let ctx = self.staff_context(req, &auth).await?;
        let warning = self
            .settings_coordinator
            .create_warning(&ctx, &body.message, body.is_active.unwrap_or(true))
            .await?;

        Ok(CreateWarningApiResponse::Created(Json(WarningResponse {
            warning: warning.into(),
        })))
    }

    #[oai(path = "/warnings/:id", method = "put", tag = "AdminTags::AdminContent")]
    async fn update_warning(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateWarningRequest>,
    ) -> Result<Json<WarningResponse>, AdminError> {
        let ctx = self.staff_context(req, &auth).await?;
        let warning = self
            .settings_coordinator
            .update_warning(&ctx, id.0, body.message.as_deref(), body.is_active)
            .await?;

        Ok(Json(WarningResponse {
            warning: warning.into(),
        }))
    }
}

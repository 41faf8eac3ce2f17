use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::{Api, BearerAuth, helpers};
use crate::app_data::AppData;
use crate::coordinators::{AdminCoordinator, AuthCoordinator};
use crate::errors::AuthError;
use crate::providers::TokenProvider;
use crate::types::dto::admin::{AdminRequestResponse, RequestAdminApiResponse};
use crate::types::dto::auth::{
    LoginRequest, LoginResponse, RegisterApiResponse, RegisterRequest, UserResponse,
};
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: AuthCoordinator,
    admin_coordinator: AdminCoordinator,
    token_provider: Arc<TokenProvider>,
    app_data: Arc<AppData>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            auth_coordinator: AuthCoordinator::new(app_data.clone()),
            admin_coordinator: AdminCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn account_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, AuthError> {
        let ctx = self.request_context(req, Some(auth))?;
        Ok(helpers::refresh_account(ctx, &self.app_data).await?)
    }
}

impl Api for AuthApi {
    fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = self.request_context(req, None)?;

        let outcome = self
            .auth_coordinator
            .login(&ctx, &body.username, &body.password)
            .await?;

        Ok(Json(LoginResponse {
            user: outcome.user.into(),
            access_token: outcome.access_token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.expires_in,
        }))
    }

    /// Create a customer account
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let ctx = self.request_context(req, None)?;

        let user = self
            .auth_coordinator
            .register(&ctx, &body.username, &body.password)
            .await?;

        Ok(RegisterApiResponse::Created(Json(UserResponse { user: user.into() })))
    }

    /// Verify JWT and return the current user
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let ctx = self.account_context(req, &auth).await?;
        let user = self.auth_coordinator.whoami(&ctx).await?;

        Ok(Json(UserResponse { user: user.into() }))
    }

    /// Ask the owner for the admin role
    #[oai(path = "/request-admin", method = "post", tag = "AuthTags::Authentication")]
    async fn request_admin(&self, req: &Request, auth: BearerAuth) -> Result<RequestAdminApiResponse, AuthError> {
        let ctx = self.account_context(req, &auth).await?;
        let request = self.admin_coordinator.request_admin(&ctx).await?;

        Ok(RequestAdminApiResponse::Created(Json(AdminRequestResponse {
            request: request.into(),
        })))
    }
}

// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod payments;
pub mod products;
pub mod settings;
pub mod setup;
pub mod upload_limit;

#[cfg(test)]
mod helpers_test;

use std::sync::Arc;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use payments::PaymentsApi;
pub use products::ProductsApi;
pub use settings::SettingsApi;
pub use setup::SetupApi;
pub use upload_limit::UploadLimit;

use poem::endpoint::StaticFilesEndpoint;
use poem::middleware::{Cors, Tracing};
use poem::{Endpoint, EndpointExt, Request, Route};
use poem_openapi::{OpenApiService, SecurityScheme, auth::Bearer};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// Shared request handling for endpoint structs
pub trait Api {
    fn token_provider(&self) -> &TokenProvider;

    /// Context for an endpoint; `auth` is None on public endpoints
    fn request_context(&self, req: &Request, auth: Option<&BearerAuth>) -> Result<RequestContext, InternalError> {
        helpers::create_request_context(req, auth.map(|auth| auth.0.token.as_str()), self.token_provider())
    }
}

/// Assemble the HTTP application
///
/// JSON API under `/api`, its OpenAPI document at `/spec`, Swagger UI under
/// `/swagger` and uploaded proofs under `/uploads`. API request bodies are
/// capped at the upload limit plus multipart framing.
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> impl Endpoint + use<> {
    let api_service = OpenApiService::new(
        (
            HealthApi,
            SetupApi::new(app_data.clone()),
            AuthApi::new(app_data.clone()),
            ProductsApi::new(app_data.clone()),
            PaymentsApi::new(app_data.clone()),
            AdminApi::new(app_data.clone()),
            SettingsApi::new(app_data.clone()),
        ),
        "PIX Storefront API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();
    let spec = api_service.spec_endpoint();

    let upload_limit = UploadLimit::new(app_data.upload_provider.max_bytes());

    Route::new()
        .nest("/api", api_service.with(upload_limit))
        .nest("/swagger", ui)
        .at("/spec", spec)
        .nest(
            "/uploads",
            StaticFilesEndpoint::new(app_data.upload_provider.upload_dir().clone()),
        )
        .with(Cors::new())
        .with(Tracing)
}

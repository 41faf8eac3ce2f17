use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::app_data::AppData;
use crate::coordinators::SetupCoordinator;
use crate::errors::AdminError;
use crate::types::dto::admin::InitResponse;
use crate::types::internal::context::RequestContext;

/// First-run initialization endpoint
pub struct SetupApi {
    setup_coordinator: SetupCoordinator,
}

impl SetupApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            setup_coordinator: SetupCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum SetupTags {
    /// System initialization
    Setup,
}

#[OpenApi]
impl SetupApi {
    /// Seed the owner/admin accounts and default PIX key
    ///
    /// Idempotent. Only accounts with a configured password are created;
    /// credentials are never generated over HTTP.
    #[oai(path = "/init", method = "post", tag = "SetupTags::Setup")]
    async fn init(&self, req: &Request) -> Result<Json<InitResponse>, AdminError> {
        let mut ctx = RequestContext::for_system("init");
        if let Some(ip_address) = super::helpers::extract_ip_address(req) {
            ctx = ctx.with_ip_address(ip_address);
        }

        let report = self.setup_coordinator.initialize(&ctx, false).await?;

        Ok(Json(InitResponse {
            created: report.created,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_init_reports_created_items_once() {
        let (app_data, _dir) = setup_test_app_data().await;
        let api = SetupApi::new(app_data.clone());
        let req = Request::builder().finish();

        let first = api.init(&req).await.unwrap();
        assert_eq!(first.0.created.len(), 3);

        let second = api.init(&req).await.unwrap();
        assert!(second.0.created.is_empty());
    }
}

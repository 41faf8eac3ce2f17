use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::api::{Api, BearerAuth, helpers};
use crate::app_data::AppData;
use crate::coordinators::CatalogCoordinator;
use crate::errors::StoreError;
use crate::providers::TokenProvider;
use crate::types::dto::common::SuccessResponse;
use crate::types::dto::products::{
    CreateProductApiResponse, CreateProductRequest, ProductListResponse, ProductResponse,
    UpdateProductRequest,
};
use crate::types::internal::context::RequestContext;

/// Public catalog and product administration
pub struct ProductsApi {
    catalog_coordinator: CatalogCoordinator,
    token_provider: Arc<TokenProvider>,
    app_data: Arc<AppData>,
}

impl ProductsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            catalog_coordinator: CatalogCoordinator::new(app_data.clone()),
            app_data,
        }
    }

    async fn staff_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, StoreError> {
        let ctx = self.request_context(req, Some(auth))?;
        let ctx = helpers::refresh_account(ctx, &self.app_data).await?;
        if !ctx.is_staff() {
            return Err(StoreError::admin_required());
        }
        Ok(ctx)
    }
}

impl Api for ProductsApi {
    fn token_provider(&self) -> &TokenProvider {
        &self.token_provider
    }
}

#[derive(Tags)]
enum ProductTags {
    /// Storefront catalog
    Products,
}

#[OpenApi]
impl ProductsApi {
    /// Active products, featured first then newest
    #[oai(path = "/products", method = "get", tag = "ProductTags::Products")]
    async fn list_products(&self) -> Result<Json<ProductListResponse>, StoreError> {
        let products = self.catalog_coordinator.list_active_products().await?;

        Ok(Json(ProductListResponse {
            products: products.into_iter().map(Into::into).collect(),
        }))
    }

    /// Single active product
    #[oai(path = "/products/:id", method = "get", tag = "ProductTags::Products")]
    async fn get_product(&self, id: Path<i32>) -> Result<Json<ProductResponse>, StoreError> {
        let product = self.catalog_coordinator.get_product(id.0).await?;

        Ok(Json(ProductResponse {
            product: product.into(),
        }))
    }

    #[oai(path = "/products", method = "post", tag = "ProductTags::Products")]
    async fn create_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateProductRequest>,
    ) -> Result<CreateProductApiResponse, StoreError> {
        let ctx = self.staff_context(req, &auth).await?;
        let product = self
            .catalog_coordinator
            .create_product(&ctx, body.0.into())
            .await?;

        Ok(CreateProductApiResponse::Created(Json(ProductResponse {
            product: product.into(),
        })))
    }

    /// Partial update; omitted fields are left alone
    #[oai(path = "/products/:id", method = "put", tag = "ProductTags::Products")]
    async fn update_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateProductRequest>,
    ) -> Result<Json<ProductResponse>, StoreError> {
        let ctx = self.staff_context(req, &auth).await?;
        let product = self
            .catalog_coordinator
            .update_product(&ctx, id.0, body.0.into())
            .await?;

        Ok(Json(ProductResponse {
            product: product.into(),
        }))
    }

    /// Delete a product that no payment references
    #[oai(path = "/products/:id", method = "delete", tag = "ProductTags::Products")]
    async fn delete_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<SuccessResponse>, StoreError> {
        let ctx = self.staff_context(req, &auth).await?;
        self.catalog_coordinator.delete_product(&ctx, id.0).await?;

        Ok(Json(SuccessResponse { success: true }))
    }
}

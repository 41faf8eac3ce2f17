use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::types::db::product;
use crate::types::internal::audit::ActivityAction;
use crate::types::internal::catalog::{NewProduct, ProductChanges};
use crate::types::internal::context::RequestContext;

/// Orchestrates the product catalog
pub struct CatalogCoordinator {
    app_data: Arc<AppData>,
}

fn validate_name(name: &str) -> Result<(), InternalError> {
    if name.trim().is_empty() {
        return Err(InternalError::validation("name", "must not be empty"));
    }
    Ok(())
}

fn validate_price(field: &str, cents: i64) -> Result<(), InternalError> {
    if cents < 0 {
        return Err(InternalError::validation(field, "must not be negative"));
    }
    Ok(())
}

impl CatalogCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    /// Storefront listing; inactive products never appear
    pub async fn list_active_products(&self) -> Result<Vec<product::Model>, InternalError> {
        self.app_data.product_store.list_active(&self.app_data.db).await
    }

    pub async fn list_all_products(&self) -> Result<Vec<product::Model>, InternalError> {
        self.app_data.product_store.list_all(&self.app_data.db).await
    }

    /// Public product lookup; inactive products read as missing
    pub async fn get_product(&self, product_id: i32) -> Result<product::Model, InternalError> {
        match self.app_data.product_store.find_by_id(&self.app_data.db, product_id).await? {
            Some(product) if product.is_active => Ok(product),
            _ => Err(CatalogError::ProductNotFound(product_id).into()),
        }
    }

    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        mut input: NewProduct,
    ) -> Result<product::Model, InternalError> {
        validate_name(&input.name)?;
        validate_price("price_cents", input.price_cents)?;
        if let Some(old_price) = input.old_price_cents {
            validate_price("old_price_cents", old_price)?;
        }
        input.name = input.name.trim().to_string();

        let product = self.app_data.product_store.create(&self.app_data.db, input).await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::ProductCreated)
            .with_context(ctx)
            .add_field("productId", product.id)
            .add_field("name", &product.name)
            .write()
            .await
        {
            tracing::error!("Failed to log product creation: {:?}", audit_err);
        }

        Ok(product)
    }

    /// Partial update; fields left as `None` keep their value
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        product_id: i32,
        mut changes: ProductChanges,
    ) -> Result<product::Model, InternalError> {
        if changes.is_empty() {
            return Err(InternalError::validation("body", "at least one field must be provided"));
        }
        if let Some(name) = changes.name.as_mut() {
            validate_name(name)?;
            *name = name.trim().to_string();
        }
        if let Some(price) = changes.price_cents {
            validate_price("price_cents", price)?;
        }
        if let Some(Some(old_price)) = changes.old_price_cents {
            validate_price("old_price_cents", old_price)?;
        }

        let product = self
            .app_data
            .product_store
            .update(&self.app_data.db, product_id, changes)
            .await?;

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .log_action(ctx, ActivityAction::ProductUpdated, "productId", product.id)
            .await
        {
            tracing::error!("Failed to log product update: {:?}", audit_err);
        }

        Ok(product)
    }

    /// Delete a product that no payment references
    pub async fn delete_product(&self, ctx: &RequestContext, product_id: i32) -> Result<(), InternalError> {
        let db = &self.app_data.db;
        let product = self.app_data.product_store.get_by_id(db, product_id).await?;

        if self.app_data.payment_store.count_for_product(db, product.id).await? > 0 {
            return Err(CatalogError::ProductInUse(product.id).into());
        }

        if !self.app_data.product_store.delete(db, product.id).await? {
            return Err(CatalogError::ProductNotFound(product_id).into());
        }

        if let Err(audit_err) = self
            .app_data
            .audit_logger
            .builder(ActivityAction::ProductDeleted)
            .with_context(ctx)
            .add_field("productId", product.id)
            .add_field("name", &product.name)
            .write()
            .await
        {
            tracing::error!("Failed to log product deletion: {:?}", audit_err);
        }

        Ok(())
    }
}

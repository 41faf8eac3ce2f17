use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::types::db::product::{self, ActiveModel, Entity as Product};
use crate::types::internal::catalog::{NewProduct, ProductChanges};

fn encode_tags(tags: &[String]) -> Result<String, InternalError> {
    serde_json::to_string(tags).map_err(|e| InternalError::parse("product_tags", e.to_string()))
}

/// ProductStore manages the catalog
pub struct ProductStore {}

impl ProductStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Storefront listing: active only, featured first, then newest
    pub async fn list_active(&self, conn: &impl ConnectionTrait) -> Result<Vec<product::Model>, InternalError> {
        Product::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_desc(product::Column::IsFeatured)
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_products", e))
    }

    /// Back-office listing, including inactive products
    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<product::Model>, InternalError> {
        Product::find()
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_products", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        product_id: i32,
    ) -> Result<Option<product::Model>, InternalError> {
        Product::find_by_id(product_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_product", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        product_id: i32,
    ) -> Result<product::Model, InternalError> {
        self.find_by_id(conn, product_id)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(product_id).into())
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        input: NewProduct,
    ) -> Result<product::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_product = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price_cents: Set(input.price_cents),
            old_price_cents: Set(input.old_price_cents),
            image_url: Set(input.image_url),
            is_active: Set(input.is_active),
            is_featured: Set(input.is_featured),
            tags: Set(encode_tags(&input.tags)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_product
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_product", e))
    }

    /// Apply a partial update and bump `updated_at`
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        product_id: i32,
        changes: ProductChanges,
    ) -> Result<product::Model, InternalError> {
        let existing = self.get_by_id(conn, product_id).await?;
        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price_cents) = changes.price_cents {
            active.price_cents = Set(price_cents);
        }
        if let Some(old_price_cents) = changes.old_price_cents {
            active.old_price_cents = Set(old_price_cents);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_featured) = changes.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(encode_tags(&tags)?);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_product", e))
    }

    /// Delete a product; returns false when no row matched
    pub async fn delete(&self, conn: &impl ConnectionTrait, product_id: i32) -> Result<bool, InternalError> {
        let result = Product::delete_by_id(product_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_product", e))?;

        Ok(result.rows_affected > 0)
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{sample_product, setup_test_db};

    #[tokio::test]
    async fn test_inactive_products_are_not_listed() {
        let db = setup_test_db().await;
        let store = ProductStore::new();

        let visible = store.create(&db, sample_product("Visible", 1000)).await.unwrap();
        let mut hidden = sample_product("Hidden", 500);
        hidden.is_active = false;
        store.create(&db, hidden).await.unwrap();

        let listed = store.list_active(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, visible.id);

        assert_eq!(store.list_all(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_featured_products_come_first() {
        let db = setup_test_db().await;
        let store = ProductStore::new();

        let mut featured = sample_product("Featured", 100);
        featured.is_featured = true;
        let featured = store.create(&db, featured).await.unwrap();
        store.create(&db, sample_product("Newer", 200)).await.unwrap();

        let listed = store.list_active(&db).await.unwrap();
        assert_eq!(listed[0].id, featured.id);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = setup_test_db().await;
        let store = ProductStore::new();
        let product = store.create(&db, sample_product("Box", 1500)).await.unwrap();

        let updated = store
            .update(
                &db,
                product.id,
                ProductChanges {
                    price_cents: Some(1200),
                    old_price_cents: Some(Some(1500)),
                    tags: Some(vec!["promo".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Box");
        assert_eq!(updated.price_cents, 1200);
        assert_eq!(updated.old_price_cents, Some(1500));
        assert_eq!(updated.tag_list(), vec!["promo".to_string()]);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = setup_test_db().await;
        let store = ProductStore::new();

        let err = store.update(&db, 42, ProductChanges::default()).await.unwrap_err();
        assert!(matches!(err, InternalError::Catalog(CatalogError::ProductNotFound(42))));
    }

    #[tokio::test]
    async fn test_delete_reports_missing_rows() {
        let db = setup_test_db().await;
        let store = ProductStore::new();
        let product = store.create(&db, sample_product("Gone", 10)).await.unwrap();

        assert!(store.delete(&db, product.id).await.unwrap());
        assert!(!store.delete(&db, product.id).await.unwrap());
    }
}

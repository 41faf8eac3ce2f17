use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::product;
use crate::types::internal::catalog::{NewProduct, ProductChanges};

/// Catalog entry. Prices are in cents.
#[derive(Object, Debug, Clone, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub old_price_cents: Option<i64>,
    pub image_url: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<product::Model> for ProductDto {
    fn from(model: product::Model) -> Self {
        let tags = model.tag_list();
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            old_price_cents: model.old_price_cents,
            image_url: model.image_url,
            is_active: model.is_active,
            is_featured: model.is_featured,
            tags,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Compact product reference embedded in payment listings
#[derive(Object, Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub price_cents: i64,
    pub image_url: String,
}

impl From<product::Model> for ProductSummary {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price_cents: model.price_cents,
            image_url: model.image_url,
        }
    }
}

#[derive(Object, Debug, Clone)]
pub struct CreateProductRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    #[oai(default)]
    pub description: String,

    pub price_cents: i64,

    pub old_price_cents: Option<i64>,

    #[oai(default)]
    pub image_url: String,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,

    #[oai(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Object, Debug, Clone, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub old_price_cents: Option<i64>,

    /// Clears the old price when true
    #[oai(default)]
    pub clear_old_price: bool,

    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Object, Debug)]
pub struct ProductResponse {
    pub product: ProductDto,
}

#[derive(Object, Debug)]
pub struct ProductListResponse {
    pub products: Vec<ProductDto>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            old_price_cents: request.old_price_cents,
            image_url: request.image_url,
            is_active: request.is_active.unwrap_or(true),
            is_featured: request.is_featured.unwrap_or(false),
            tags: request.tags,
        }
    }
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(request: UpdateProductRequest) -> Self {
        // `clear_old_price` wins over a supplied old price
        let old_price_cents = if request.clear_old_price {
            Some(None)
        } else {
            request.old_price_cents.map(Some)
        };

        Self {
            name: request.name,
            description: request.description,
            price_cents: request.price_cents,
            old_price_cents,
            image_url: request.image_url,
            is_active: request.is_active,
            is_featured: request.is_featured,
            tags: request.tags,
        }
    }
}

#[derive(ApiResponse, Debug)]
pub enum CreateProductApiResponse {
    /// Product created
    #[oai(status = 201)]
    Created(Json<ProductResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request = CreateProductRequest {
            name: "Box".to_string(),
            description: String::new(),
            price_cents: 100,
            old_price_cents: None,
            image_url: String::new(),
            is_active: None,
            is_featured: None,
            tags: vec![],
        };

        let product = NewProduct::from(request);
        assert!(product.is_active);
        assert!(!product.is_featured);
    }

    #[test]
    fn test_update_request_can_clear_old_price() {
        let clear = ProductChanges::from(UpdateProductRequest {
            old_price_cents: Some(500),
            clear_old_price: true,
            ..Default::default()
        });
        assert_eq!(clear.old_price_cents, Some(None));

        let set = ProductChanges::from(UpdateProductRequest {
            old_price_cents: Some(500),
            ..Default::default()
        });
        assert_eq!(set.old_price_cents, Some(Some(500)));

        assert!(ProductChanges::from(UpdateProductRequest::default()).is_empty());
    }
}

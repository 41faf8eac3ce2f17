use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("Product {0} is referenced by payments")]
    ProductInUse(i32),
}

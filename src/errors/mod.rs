// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::{AdminError, AuthError, StoreError};
pub use internal::InternalError;

#[cfg(test)]
mod internal_test;

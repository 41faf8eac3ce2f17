// API-facing error types
pub mod admin;
pub mod auth;
pub mod store;

// Re-exports for convenience
pub use admin::AdminError;
pub use auth::AuthError;
pub use store::StoreError;


#[cfg(test)]
mod auth_test;

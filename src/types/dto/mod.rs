pub mod admin;
pub mod auth;
pub mod common;
pub mod payments;
pub mod products;
pub mod settings;

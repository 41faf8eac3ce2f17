// Library exports for the binary and integration tests

pub mod api;
pub mod app_data;
pub mod audit;
pub mod cli;
pub mod config;
pub mod coordinators;
pub mod errors;
pub mod providers;
pub mod stores;
pub mod types;

#[cfg(test)]
pub(crate) mod test;

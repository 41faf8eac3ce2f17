mod bootstrap_settings;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
mod seed_settings;

pub use bootstrap_settings::BootstrapSettings;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
pub use seed_settings::{SeedAccount, SeedSettings};

#[cfg(test)]
pub use env_provider::MockEnvironment;

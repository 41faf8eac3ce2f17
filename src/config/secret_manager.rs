use std::fmt;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    /// Load and validate all secrets from the given provider
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env, &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env_var("JWT_SECRET").required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env_var("PASSWORD_PEPPER").required(true).min_length(16)
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper mixed into password hashes
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(
                    config.secret_type.name(),
                    min_len,
                    value.len(),
                ));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{ApplicationError, EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://pixstore.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_JWT_EXPIRATION_MINUTES: i64 = 24 * 60;

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
    jwt_expiration_minutes: i64,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    ///
    /// Every setting has a default; only malformed values are errors.
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let database_url = env
            .get_non_empty("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let server_host = env
            .get_non_empty("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        IpAddr::from_str(&server_host)
            .map_err(|_| ApplicationError::invalid("HOST", format!("'{}' is not an IP address", server_host)))?;

        let server_port = match env.get_non_empty("PORT") {
            Some(raw) => {
                let port: u16 = raw.parse().map_err(|e| ApplicationError::parse("PORT", e))?;
                if port == 0 {
                    return Err(ApplicationError::invalid("PORT", "must be between 1 and 65535"));
                }
                port
            }
            None => DEFAULT_PORT,
        };

        let upload_dir = env
            .get_non_empty("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let max_upload_bytes = match env.get_non_empty("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| ApplicationError::parse("MAX_UPLOAD_BYTES", e))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        if max_upload_bytes == 0 {
            return Err(ApplicationError::invalid("MAX_UPLOAD_BYTES", "must be greater than zero"));
        }

        let jwt_expiration_minutes = match env.get_non_empty("JWT_EXPIRATION_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| ApplicationError::parse("JWT_EXPIRATION_MINUTES", e))?,
            None => DEFAULT_JWT_EXPIRATION_MINUTES,
        };
        if jwt_expiration_minutes <= 0 {
            return Err(ApplicationError::invalid("JWT_EXPIRATION_MINUTES", "must be positive"));
        }

        Ok(Self {
            database_url,
            server_host,
            server_port,
            upload_dir,
            max_upload_bytes,
            jwt_expiration_minutes,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_apply_when_unset() {
        let settings = BootstrapSettings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.upload_dir(), Path::new("uploads"));
        assert_eq!(settings.max_upload_bytes(), 5 * 1024 * 1024);
        assert_eq!(settings.jwt_expiration_minutes(), 1440);
    }

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("UPLOAD_DIR", "/tmp/proofs"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("JWT_EXPIRATION_MINUTES", "30"),
        ]);

        let settings = BootstrapSettings::from_env_provider(&env).unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.upload_dir(), Path::new("/tmp/proofs"));
        assert_eq!(settings.max_upload_bytes(), 1024);
        assert_eq!(settings.jwt_expiration_minutes(), 30);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        for bad in ["0", "70000", "abc"] {
            let env = MockEnvironment::empty().with_var("PORT", bad);
            assert!(BootstrapSettings::from_env_provider(&env).is_err(), "port {} accepted", bad);
        }
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let env = MockEnvironment::empty().with_var("HOST", "not-an-ip");

        let err = BootstrapSettings::from_env_provider(&env).unwrap_err();
        assert!(err.to_string().contains("HOST"));
    }

    #[test]
    fn test_zero_upload_limit_is_rejected() {
        let env = MockEnvironment::empty().with_var("MAX_UPLOAD_BYTES", "0");

        assert!(BootstrapSettings::from_env_provider(&env).is_err());
    }
}

use crate::config::{ApplicationError, EnvironmentProvider, SystemEnvironment};

/// An account created by bootstrap/init when missing
#[derive(Debug, Clone, PartialEq)]
pub struct SeedAccount {
    pub username: String,

    /// None means "generate one" for the CLI and "skip" for the HTTP init endpoint
    pub password: Option<String>,
}

/// Initial accounts and settings seeded into an empty store
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSettings {
    pub owner: SeedAccount,
    pub admin: SeedAccount,
    pub pix_key: Option<String>,
}

impl SeedSettings {
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let owner = SeedAccount {
            username: Self::username(env, "OWNER_USERNAME", "owner")?,
            password: env.get_non_empty("OWNER_PASSWORD"),
        };
        let admin = SeedAccount {
            username: Self::username(env, "ADMIN_USERNAME", "admin")?,
            password: env.get_non_empty("ADMIN_PASSWORD"),
        };

        if owner.username == admin.username {
            return Err(ApplicationError::invalid(
                "ADMIN_USERNAME",
                "must differ from OWNER_USERNAME",
            ));
        }

        Ok(Self {
            owner,
            admin,
            pix_key: env.get_non_empty("DEFAULT_PIX_KEY"),
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    fn username(env: &dyn EnvironmentProvider, var: &str, default: &str) -> Result<String, ApplicationError> {
        let username = env
            .get_non_empty(var)
            .unwrap_or_else(|| default.to_string())
            .to_lowercase();

        if username.chars().any(char::is_whitespace) {
            return Err(ApplicationError::invalid(var, "must not contain whitespace"));
        }
        Ok(username)
    }

    /// Seeded usernames cannot be claimed through registration
    pub fn is_reserved(&self, username: &str) -> bool {
        username == self.owner.username || username == self.admin.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_defaults_without_passwords() {
        let seed = SeedSettings::from_env_provider(&MockEnvironment::empty()).unwrap();

        assert_eq!(seed.owner.username, "owner");
        assert_eq!(seed.admin.username, "admin");
        assert!(seed.owner.password.is_none());
        assert!(seed.pix_key.is_none());
    }

    #[test]
    fn test_usernames_are_lowercased_and_reserved() {
        let env = MockEnvironment::empty().with_vars(&[
            ("OWNER_USERNAME", "Boss"),
            ("OWNER_PASSWORD", "owner-secret"),
            ("DEFAULT_PIX_KEY", "pix@example.com"),
        ]);

        let seed = SeedSettings::from_env_provider(&env).unwrap();

        assert_eq!(seed.owner.username, "boss");
        assert_eq!(seed.owner.password.as_deref(), Some("owner-secret"));
        assert_eq!(seed.pix_key.as_deref(), Some("pix@example.com"));
        assert!(seed.is_reserved("boss"));
        assert!(seed.is_reserved("admin"));
        assert!(!seed.is_reserved("customer"));
    }

    #[test]
    fn test_same_owner_and_admin_username_is_rejected() {
        let env = MockEnvironment::empty().with_vars(&[("OWNER_USERNAME", "root"), ("ADMIN_USERNAME", "ROOT")]);

        assert!(SeedSettings::from_env_provider(&env).is_err());
    }
}

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

use crate::errors::InternalError;

/// Password hashing and secure password generation
///
/// Hashes are Argon2id PHC strings keyed with the server pepper, so a leaked
/// database alone is not enough to attack the hashes offline.
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        Ok(self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string())
    }

    /// Check a password against a stored hash
    ///
    /// A malformed stored hash is an infrastructure error, a mismatch is `false`.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| InternalError::parse("password_hash", e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a cryptographically secure random password
    ///
    /// 20 characters drawn from upper and lower case letters, digits and symbols.
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

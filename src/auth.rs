use argon2::{
    Argon2,
    PasswordHash,
    PasswordVerifier,
    PasswordHasher,
};
use argon2::password_hash::SaltString;
use async_trait::async_trait;
use rand::rngs::OsRng;

use crate::config::Config;
use crate::error::ApiError;

/// Decides whether a username/password pair may log in.
///
/// Login handlers only see this trait, so a real credential store can replace
/// [`StaticCredentials`] without touching them.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool, ApiError>;
}

/// A single fixed account, with the password kept as an Argon2 hash.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password_hash: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> anyhow::Result<Self> {
        let password_hash = hash_password(password).map_err(anyhow::Error::msg)?;
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn with_hash(username: impl Into<String>, password_hash: impl Into<String>) -> anyhow::Result<Self> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("ADMIN_PASSWORD_HASH is not a valid PHC string: {e}"))?;
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        match &cfg.admin_password_hash {
            Some(hash) => Self::with_hash(cfg.admin_username.clone(), hash.clone()),
            None => Self::new(cfg.admin_username.clone(), &cfg.admin_password),
        }
    }
}

#[async_trait]
impl Authenticator for StaticCredentials {
    async fn authenticate(&self, username: &str, password: &str) -> Result<bool, ApiError> {
        if username != self.username {
            return Ok(false);
        }

        // Argon2 is CPU bound; keep it off the async workers.
        let password = password.to_owned();
        let stored = self.password_hash.clone();
        tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ApiError::Internal(format!("password check failed: {e}")))
    }
}

/// Verify password against an Argon2 PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| format!("argon2 hash error: {e}"))
}

pub mod extract;
pub mod handlers;
pub mod token;

use sha2::{Digest, Sha256};

use crate::config::AppConfig;
use crate::error::AppError;

/// Everything needed to authenticate the admin: the shared secret to check
/// on login and the JWT signing material.
#[derive(Clone)]
pub struct AuthContext {
    jwt_secret: String,
    pub jwt_expiry_hours: i64,
    admin_password: Option<String>,
    admin_password_hash: Option<String>,
}

impl AuthContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
            admin_password: config.admin_password.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
        }
    }

    #[cfg(test)]
    pub fn for_tests(secret: &str, password: &str) -> Self {
        Self {
            jwt_secret: secret.to_string(),
            jwt_expiry_hours: 24 * 7,
            admin_password: Some(password.to_string()),
            admin_password_hash: None,
        }
    }

    /// Check a login attempt against the configured admin secret.
    ///
    /// A configured digest takes precedence over the plaintext variant;
    /// neither configured is a server misconfiguration, not a bad login.
    pub fn verify_password(&self, candidate: &str) -> Result<(), AppError> {
        if let Some(expected) = &self.admin_password_hash {
            if sha256_hex(candidate).eq_ignore_ascii_case(expected) {
                return Ok(());
            }
            return Err(AppError::Auth("Invalid password".into()));
        }

        match &self.admin_password {
            Some(expected) if candidate == expected => Ok(()),
            Some(_) => Err(AppError::Auth("Invalid password".into())),
            None => Err(AppError::Internal("Server configuration error".into())),
        }
    }

    pub fn issue_token(&self) -> Result<String, AppError> {
        token::issue(&self.jwt_secret, self.jwt_expiry_hours)
    }

    pub fn verify_token(&self, raw: &str) -> Result<token::AdminClaims, AppError> {
        token::verify(&self.jwt_secret, raw)
    }
}

pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

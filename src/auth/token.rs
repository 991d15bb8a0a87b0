use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by the admin bearer token (HS256).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always `"admin"`; there is exactly one privileged identity.
    pub sub: String,
    pub role: String,
    pub email: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

pub fn issue(secret: &str, expiry_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = AdminClaims {
        sub: "admin".to_string(),
        role: "admin".to_string(),
        email: "admin@portfolio.local".to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}

pub fn verify(secret: &str, raw: &str) -> Result<AdminClaims, AppError> {
    decode::<AdminClaims>(
        raw,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Auth("Token has expired. Please login again.".into())
        }
        _ => AppError::Auth("Invalid or malformed token.".into()),
    })
}

use std::env;

/// Server configuration, loaded from the process environment.
///
/// Every value has a development-friendly default except the admin
/// credential: at least one of `ADMIN_PASSWORD` / `ADMIN_PASSWORD_HASH`
/// must be set or login is impossible.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Plaintext admin password (development setups).
    pub admin_password: Option<String>,
    /// SHA-256 hex digest of the admin password. Takes precedence over the
    /// plaintext variant when both are set. Generate with the
    /// `hash-password` binary.
    pub admin_password_hash: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: Option<String>,
    /// Comma-separated CORS allowlist. Unset means any origin is accepted.
    pub allowed_origins: Option<Vec<String>>,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let allowed_origins = env::var("ALLOWED_ORIGINS").ok().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "folio".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".to_string()),
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24 * 7),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").ok(),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "folio-media".to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            allowed_origins,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }
}

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::token::AdminClaims;
use crate::auth::AuthContext;
use crate::error::AppError;

/// Extractor guarding admin-only routes.
///
/// Pulls the `Authorization: Bearer <JWT>` header, verifies the signature
/// and expiry, and hands the claims to the handler. Any failure becomes a
/// 401 before the handler body runs.
impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
    AuthContext: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Auth("No token provided. Please login first.".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Auth("No token provided. Please login first.".into()))?;

        auth.verify_token(token)
    }
}

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::token::AdminClaims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub expires_in: String,
}

/// `POST /api/auth/login` — password in, bearer token out.
///
/// A wrong password yields 401 with no token in the body.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    state.auth.verify_password(&req.password)?;
    let token = state.auth.issue_token()?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        expires_in: format!("{}h", state.auth.jwt_expiry_hours),
    }))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    pub user: AdminClaims,
}

/// `GET /api/auth/verify` — echoes the claims the extractor validated.
pub async fn verify_handler(claims: AdminClaims) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        message: "Token is valid".to_string(),
        user: claims,
    })
}

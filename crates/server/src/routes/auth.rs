//! Admin session login and logout.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use advice_for_life_core::{AdminRole, Email};

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AdminAuthService;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
}

/// Log an admin in and establish a session.
///
/// POST /auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    // An unparseable email can't match an admin; same response as a wrong
    // password so the endpoint doesn't leak which emails exist.
    let email = Email::parse_normalized(&body.email)
        .map_err(|_| AppError::Auth(AuthError::InvalidCredentials))?;

    let user = AdminAuthService::new(state.pool())
        .login(&email, &body.password)
        .await?;

    let current = CurrentAdmin::from(&user);
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(admin = %user.email, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}

/// Log the current admin out.
///
/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Json(serde_json::json!({ "success": true })))
}

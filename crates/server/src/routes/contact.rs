//! Contact form.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use advice_for_life_core::Email;

use crate::db::ContactRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Contact form body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Contact form response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Save a contact form submission.
///
/// POST /api/contact
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    let name = body.name.as_deref().map(str::trim).unwrap_or_default();
    let message = body.message.as_deref().map(str::trim).unwrap_or_default();

    if name.is_empty() || message.is_empty() || body.email.is_none() {
        return Err(AppError::Validation(
            "Name, email, and message are required".to_owned(),
        ));
    }

    let email = Email::parse_normalized(body.email.as_deref().unwrap_or_default())
        .map_err(|_| AppError::Validation("Invalid email format".to_owned()))?;
    let subject = body
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No subject");

    let submission = ContactRepository::new(state.pool())
        .create(name, &email, subject, message)
        .await?;

    tracing::info!(submission_id = %submission.id, "Contact submission saved");

    Ok(Json(ContactResponse {
        success: true,
        message: "Your message has been received. We'll get back to you soon!".to_owned(),
    }))
}

//! Newsletter subscription.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use advice_for_life_core::Email;

use crate::db::SubscriberRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Subscription request body.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Which form the signup came from; defaults to `newsletter`.
    #[serde(default)]
    pub source: Option<String>,
}

/// Subscription response.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

/// Subscribe an email to the newsletter.
///
/// POST /api/subscribe
///
/// Already-subscribed addresses get a 400 (the form shows the error);
/// previously unsubscribed addresses are quietly re-subscribed.
#[instrument(skip(state, body))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let email = Email::parse_normalized(body.email.as_deref().unwrap_or_default())
        .map_err(|_| AppError::Validation("Please provide a valid email address".to_owned()))?;
    let source = body.source.unwrap_or_else(|| "newsletter".to_owned());

    let repo = SubscriberRepository::new(state.pool());

    if let Some(existing) = repo.find_by_email(&email).await? {
        if existing.subscribed {
            return Err(AppError::Validation("You're already subscribed!".to_owned()));
        }
        repo.resubscribe(&email).await?;
        tracing::info!(email = %email, "Subscriber returned");
        return Ok(Json(SubscribeResponse {
            success: true,
            message: "Welcome back!".to_owned(),
        }));
    }

    repo.create(&email, &source).await?;
    tracing::info!(email = %email, source = %source, "New subscriber");

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Successfully subscribed!".to_owned(),
    }))
}

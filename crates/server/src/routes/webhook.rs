//! Stripe webhook ingestion.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{fulfillment, orders};
use crate::state::AppState;
use crate::stripe::types::CheckoutSession;
use crate::stripe::webhook::parse_event;

/// Handle a Stripe webhook.
///
/// POST /api/webhook
///
/// The body must be read raw: signature verification runs over the exact
/// bytes Stripe signed. Only `checkout.session.completed` does any work;
/// every other event type is acknowledged and dropped. Print vendor
/// failures are swallowed so Stripe does not retry a payment we have
/// already recorded.
#[instrument(skip_all)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());

    let event = parse_event(&body, signature, &state.config().stripe.webhook_secret)
        .map_err(|e| {
            tracing::warn!(error = %e, "Webhook signature verification failed");
            AppError::Validation(e.to_string())
        })?;

    if event.event_type == "checkout.session.completed" {
        let session: CheckoutSession = serde_json::from_value(event.data.object)
            .map_err(|e| AppError::Internal(format!("undecodable checkout session: {e}")))?;

        tracing::info!(event_id = %event.id, session_id = %session.id, "Checkout completed");

        let outcome = orders::ensure_order_for_session(&state, &session).await?;
        if outcome.created {
            fulfillment::submit_print_job(&state, &outcome.order).await;
        }
    } else {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring event");
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

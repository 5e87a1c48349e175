//! Success-page order details.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use advice_for_life_core::ProductType;

use crate::db::{DownloadLinkRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{Order, ShippingAddress};
use crate::services::orders::ensure_order_for_session;
use crate::state::AppState;
use crate::stripe::StripeError;

/// Query parameters for order details.
#[derive(Debug, Deserialize)]
pub struct OrderDetailsQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Order summary shown on the success page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsResponse {
    pub email: String,
    /// Relative redemption URL, empty when the order has no download.
    pub download_url: String,
    pub product_type: ProductType,
    pub shipping_address: Option<ShippingAddress>,
    pub lulu_print_job_id: Option<i64>,
    pub lulu_print_job_status: Option<String>,
    pub lulu_tracking_id: Option<String>,
    pub lulu_tracking_url: Option<String>,
}

/// Fetch the order for a checkout session.
///
/// GET /api/order-details?session_id=...
///
/// The success page usually loads before the webhook has fired, so when no
/// order exists yet the session is fetched from Stripe and - if paid - the
/// order is materialized here. Print job submission stays on the webhook
/// path only.
#[instrument(skip(state, query))]
pub async fn order_details(
    State(state): State<AppState>,
    Query(query): Query<OrderDetailsQuery>,
) -> Result<Json<OrderDetailsResponse>> {
    let session_id = query
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Session ID is required".to_owned()))?;

    let repo = OrderRepository::new(state.pool());
    let mut order = repo.get_by_stripe_session(&session_id).await?;

    if order.is_none() {
        let session = state
            .stripe()
            .retrieve_checkout_session(&session_id)
            .await
            .map_err(|e| match e {
                StripeError::Api { status: 404, .. } => {
                    AppError::NotFound("Session not found".to_owned())
                }
                other => AppError::Stripe(other),
            })?;

        if session.is_paid() {
            order = Some(ensure_order_for_session(&state, &session).await?.order);
        }
    }

    let order = order.ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
    let download_url = download_url_for(&state, &order).await?;

    Ok(Json(OrderDetailsResponse {
        email: order.email,
        download_url,
        product_type: order.product_type,
        shipping_address: order.shipping_address,
        lulu_print_job_id: order.lulu_print_job_id,
        lulu_print_job_status: order.lulu_print_job_status,
        lulu_tracking_id: order.lulu_tracking_id,
        lulu_tracking_url: order.lulu_tracking_url,
    }))
}

async fn download_url_for(state: &AppState, order: &Order) -> Result<String> {
    let link = DownloadLinkRepository::new(state.pool())
        .get_latest_for_order(order.id)
        .await?;

    Ok(link
        .map(|l| format!("/api/download?token={}", l.token))
        .unwrap_or_default())
}

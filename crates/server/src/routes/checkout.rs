//! Checkout session creation.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use advice_for_life_core::ProductType;

use crate::catalog::{self, ALLOWED_SHIPPING_COUNTRIES};
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stripe::CheckoutSessionParams;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Edition to buy; defaults to the PDF.
    #[serde(default)]
    pub product_type: Option<String>,
}

/// Checkout response: the hosted payment page URL.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Create a Stripe checkout session for one edition of the book.
///
/// POST /api/checkout
#[instrument(skip(state, body))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let product_type: ProductType = body
        .product_type
        .as_deref()
        .unwrap_or("pdf")
        .parse()
        .map_err(|_| AppError::Validation("Invalid product type".to_owned()))?;

    let product = catalog::product(product_type);
    let base_url = &state.config().base_url;

    let params = CheckoutSessionParams {
        product_name: product.name.to_owned(),
        product_description: product.description.to_owned(),
        image_url: Some(format!("{base_url}/static/book-cover.png")),
        unit_amount: product.unit_amount,
        success_url: format!("{base_url}/success?session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{base_url}/#purchase"),
        metadata: vec![
            ("product".to_owned(), product_type.as_str().to_owned()),
            ("product_name".to_owned(), product.name.to_owned()),
        ],
        collect_shipping: product_type.requires_shipping(),
        allowed_countries: ALLOWED_SHIPPING_COUNTRIES
            .iter()
            .map(|c| (*c).to_owned())
            .collect(),
    };

    let session = state.stripe().create_checkout_session(&params).await?;
    let url = session
        .url
        .ok_or_else(|| AppError::Internal("checkout session has no URL".to_owned()))?;

    tracing::info!(session_id = %session.id, product = %product_type, "Checkout session created");
    Ok(Json(CheckoutResponse { url }))
}

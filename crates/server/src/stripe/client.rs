//! Stripe checkout session client.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::StripeError;
use super::types::CheckoutSession;

/// Stripe API base URL.
const API_BASE: &str = "https://api.stripe.com/v1";

/// Parameters for creating a hosted checkout session.
///
/// The client turns these into Stripe's bracketed form encoding
/// (`line_items[0][price_data][unit_amount]=...`).
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    /// Display name of the line item.
    pub product_name: String,
    /// Display description of the line item.
    pub product_description: String,
    /// Product image shown on the payment page.
    pub image_url: Option<String>,
    /// Price in cents.
    pub unit_amount: i64,
    /// Where Stripe redirects after payment; may contain the
    /// `{CHECKOUT_SESSION_ID}` placeholder.
    pub success_url: String,
    /// Where Stripe redirects on cancel.
    pub cancel_url: String,
    /// Metadata set on both the session and its payment intent. The webhook
    /// reads `product` back out of this.
    pub metadata: Vec<(String, String)>,
    /// Collect a shipping address (physical editions).
    pub collect_shipping: bool,
    /// Allowed shipping countries (ISO 3166-1 alpha-2), used when
    /// `collect_shipping` is set.
    pub allowed_countries: Vec<String>,
}

impl CheckoutSessionParams {
    /// Flatten into Stripe's form encoding.
    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_owned(), "payment".to_owned()),
            (
                "payment_method_types[0]".to_owned(),
                "card".to_owned(),
            ),
            ("line_items[0][quantity]".to_owned(), "1".to_owned()),
            (
                "line_items[0][price_data][currency]".to_owned(),
                "usd".to_owned(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_owned(),
                self.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_owned(),
                self.product_name.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]".to_owned(),
                self.product_description.clone(),
            ),
            ("success_url".to_owned(), self.success_url.clone()),
            ("cancel_url".to_owned(), self.cancel_url.clone()),
        ];

        if let Some(image_url) = &self.image_url {
            form.push((
                "line_items[0][price_data][product_data][images][0]".to_owned(),
                image_url.clone(),
            ));
        }

        for (key, value) in &self.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
            form.push((
                format!("payment_intent_data[metadata][{key}]"),
                value.clone(),
            ));
        }

        if self.collect_shipping {
            for (i, country) in self.allowed_countries.iter().enumerate() {
                form.push((
                    format!("shipping_address_collection[allowed_countries][{i}]"),
                    country.clone(),
                ));
            }
            form.push((
                "phone_number_collection[enabled]".to_owned(),
                "true".to_owned(),
            ));
        }

        form
    }
}

/// Error body returned by the Stripe API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe REST API client.
///
/// Cheap to clone; holds a shared reqwest client and the API secret key.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(secret_key: SecretString) -> Self {
        Self::with_api_base(secret_key, API_BASE)
    }

    /// Create a client against a non-default API base (tests).
    #[must_use]
    pub fn with_api_base(secret_key: SecretString, api_base: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(StripeClientInner {
                client,
                secret_key,
                api_base: api_base.trim_end_matches('/').to_owned(),
            }),
        }
    }

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` if Stripe rejects the request and
    /// `StripeError::Http` on transport failures.
    #[instrument(skip(self, params), fields(product = %params.product_name))]
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions", self.inner.api_base);
        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .form(&params.to_form())
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Retrieve a checkout session by id.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` if Stripe rejects the request (including
    /// unknown session ids) and `StripeError::Http` on transport failures.
    #[instrument(skip(self))]
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions/{session_id}", self.inner.api_base);
        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<CheckoutSession, StripeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| {
                serde_json::from_str::<ApiErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.error)
                    .and_then(|e| e.message)
                    .or(Some(body))
            })
            .unwrap_or_else(|| "unknown error".to_owned());

        Err(StripeError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> CheckoutSessionParams {
        CheckoutSessionParams {
            product_name: "Hardback".to_owned(),
            product_description: "Premium hardback edition.".to_owned(),
            image_url: Some("https://example.test/static/book-cover.png".to_owned()),
            unit_amount: 4199,
            success_url: "https://example.test/success?session_id={CHECKOUT_SESSION_ID}".to_owned(),
            cancel_url: "https://example.test/#purchase".to_owned(),
            metadata: vec![("product".to_owned(), "hardback".to_owned())],
            collect_shipping: true,
            allowed_countries: vec!["US".to_owned(), "CA".to_owned()],
        }
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_form_encoding_line_item() {
        let form = params().to_form();
        assert_eq!(form_value(&form, "mode"), Some("payment"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][unit_amount]"),
            Some("4199")
        );
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][name]"),
            Some("Hardback")
        );
    }

    #[test]
    fn test_form_encoding_metadata_mirrored_to_payment_intent() {
        let form = params().to_form();
        assert_eq!(form_value(&form, "metadata[product]"), Some("hardback"));
        assert_eq!(
            form_value(&form, "payment_intent_data[metadata][product]"),
            Some("hardback")
        );
    }

    #[test]
    fn test_form_encoding_shipping_collection() {
        let form = params().to_form();
        assert_eq!(
            form_value(&form, "shipping_address_collection[allowed_countries][0]"),
            Some("US")
        );
        assert_eq!(
            form_value(&form, "shipping_address_collection[allowed_countries][1]"),
            Some("CA")
        );
        assert_eq!(
            form_value(&form, "phone_number_collection[enabled]"),
            Some("true")
        );
    }

    #[test]
    fn test_form_encoding_digital_product_skips_shipping() {
        let mut digital = params();
        digital.collect_shipping = false;
        let form = digital.to_form();
        assert!(form_value(&form, "phone_number_collection[enabled]").is_none());
        assert!(
            form_value(&form, "shipping_address_collection[allowed_countries][0]").is_none()
        );
    }
}

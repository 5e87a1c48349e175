//! Stripe REST API client.
//!
//! The site uses Stripe-hosted checkout: the server creates a checkout
//! session and redirects the customer to Stripe, then learns about completed
//! payments through a signed webhook. Only the two endpoints this flow needs
//! are wrapped; everything else stays in the Stripe dashboard.
//!
//! # Modules
//!
//! - [`client`] - Checkout session create/retrieve
//! - [`types`] - Wire types for sessions and webhook events
//! - [`webhook`] - `Stripe-Signature` verification

pub mod client;
pub mod types;
pub mod webhook;

pub use client::{CheckoutSessionParams, StripeClient};
pub use types::{CheckoutSession, Event};
pub use webhook::WebhookError;

use thiserror::Error;

/// Errors that can occur when calling the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to decode a response body.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = StripeError::Api {
            status: 402,
            message: "Your card was declined.".to_owned(),
        };
        assert_eq!(err.to_string(), "API error: 402 - Your card was declined.");
    }
}

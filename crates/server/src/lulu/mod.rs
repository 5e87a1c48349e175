//! Lulu print-on-demand API client.
//!
//! Physical book orders are forwarded to Lulu for printing and fulfillment.
//!
//! # Architecture
//!
//! - OAuth2 client-credentials authentication; access tokens are cached in
//!   memory and re-fetched transparently when close to expiry
//! - Print jobs reference publicly hosted interior/cover PDFs and a POD
//!   package id that encodes the physical product specification
//! - Write path is create-only; status and tracking are read back on demand
//!
//! # Modules
//!
//! - [`auth`] - Token acquisition and expiry handling
//! - [`client`] - Print job create/read and POD package listing
//! - [`types`] - Wire types for print jobs and addresses

pub mod auth;
pub mod client;
pub mod types;

pub use client::LuluClient;
pub use types::{LuluAddress, PrintJob, PrintJobRequest};

use thiserror::Error;

/// Errors that can occur when interacting with the Lulu API.
#[derive(Debug, Error)]
pub enum LuluError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Authentication with the token endpoint failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LuluError::Api {
            status: 400,
            message: "shipping_address invalid".to_owned(),
        };
        assert_eq!(err.to_string(), "API error: 400 - shipping_address invalid");

        let err = LuluError::AuthenticationFailed("HTTP 401: bad client".to_owned());
        assert_eq!(err.to_string(), "Authentication failed: HTTP 401: bad client");
    }
}

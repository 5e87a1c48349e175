//! Stripe webhook signature verification.
//!
//! Stripe signs webhook payloads with the endpoint's signing secret:
//!
//! ```text
//! Stripe-Signature: t=1700000000,v1=5257a869e7...,v1=...
//! ```
//!
//! The signed payload is `"{t}.{body}"`, HMAC-SHA256 under the secret.
//! Verification accepts any `v1` candidate (Stripe sends several during
//! secret rotation) and rejects timestamps outside the tolerance window.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use super::types::Event;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed payload (Stripe's recommended default).
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Errors produced by webhook verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// The `Stripe-Signature` header is absent.
    #[error("missing Stripe-Signature header")]
    MissingHeader,

    /// The header is present but not parseable.
    #[error("malformed Stripe-Signature header")]
    MalformedHeader,

    /// No `v1` candidate matched the computed signature.
    #[error("no matching signature")]
    NoMatchingSignature,

    /// The signed timestamp is outside the tolerance window.
    #[error("signature timestamp outside tolerance")]
    TimestampOutOfTolerance,

    /// The payload is not a valid event envelope.
    #[error("invalid event payload: {0}")]
    BadPayload(String),
}

/// Parsed form of the `Stripe-Signature` header.
struct SignatureHeader<'a> {
    timestamp: i64,
    v1_candidates: Vec<&'a str>,
}

fn parse_header(header: &str) -> Result<SignatureHeader<'_>, WebhookError> {
    let mut timestamp = None;
    let mut v1_candidates = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| WebhookError::MalformedHeader)?,
                );
            }
            "v1" => v1_candidates.push(value),
            // v0 and future schemes are ignored
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
    if v1_candidates.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }

    Ok(SignatureHeader {
        timestamp,
        v1_candidates,
    })
}

/// Verify a payload's signature at a given point in time.
///
/// # Errors
///
/// Returns a [`WebhookError`] describing why verification failed.
pub fn verify_signature_at(
    payload: &[u8],
    signature_header: &str,
    secret: &SecretString,
    now: DateTime<Utc>,
) -> Result<(), WebhookError> {
    let header = parse_header(signature_header)?;

    if (now.timestamp() - header.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(WebhookError::TimestampOutOfTolerance);
    }

    for candidate in &header.v1_candidates {
        let Ok(expected) = hex::decode(candidate) else {
            continue;
        };

        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::NoMatchingSignature)?;
        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        // verify_slice is constant-time
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(WebhookError::NoMatchingSignature)
}

/// Verify a payload's signature and decode the event envelope.
///
/// # Errors
///
/// Returns a [`WebhookError`] if the signature header is missing or invalid,
/// the timestamp is stale, or the payload is not a valid event.
pub fn parse_event(
    payload: &[u8],
    signature_header: Option<&str>,
    secret: &SecretString,
) -> Result<Event, WebhookError> {
    let header = signature_header.ok_or(WebhookError::MissingHeader)?;
    verify_signature_at(payload, header, secret, Utc::now())?;

    serde_json::from_slice(payload).map_err(|e| WebhookError::BadPayload(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn secret() -> SecretString {
        SecretString::from(SECRET)
    }

    #[test]
    fn test_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#;
        let now = Utc::now();
        let header = format!("t={},v1={}", now.timestamp(), sign(payload, now.timestamp()));

        assert_eq!(
            verify_signature_at(payload, &header, &secret(), now),
            Ok(())
        );
    }

    #[test]
    fn test_accepts_any_v1_candidate() {
        let payload = b"{}";
        let now = Utc::now();
        let header = format!(
            "t={},v1={},v1={}",
            now.timestamp(),
            "00".repeat(32),
            sign(payload, now.timestamp())
        );

        assert_eq!(
            verify_signature_at(payload, &header, &secret(), now),
            Ok(())
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = b"{\"amount\":100}";
        let now = Utc::now();
        let header = format!("t={},v1={}", now.timestamp(), sign(payload, now.timestamp()));

        assert_eq!(
            verify_signature_at(b"{\"amount\":999}", &header, &secret(), now),
            Err(WebhookError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = b"{}";
        let now = Utc::now();
        let header = format!("t={},v1={}", now.timestamp(), sign(payload, now.timestamp()));

        assert_eq!(
            verify_signature_at(payload, &header, &SecretString::from("whsec_other"), now),
            Err(WebhookError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let now = Utc::now();
        let stale = now.timestamp() - SIGNATURE_TOLERANCE_SECS - 1;
        let header = format!("t={stale},v1={}", sign(payload, stale));

        assert_eq!(
            verify_signature_at(payload, &header, &secret(), now),
            Err(WebhookError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_malformed_headers() {
        let payload = b"{}";
        let now = Utc::now();

        for header in ["", "v1=abc", "t=notanumber,v1=abc", "t=123"] {
            assert_eq!(
                verify_signature_at(payload, header, &secret(), now),
                Err(WebhookError::MalformedHeader),
                "header: {header:?}"
            );
        }
    }

    #[test]
    fn test_parse_event_requires_header() {
        assert!(matches!(
            parse_event(b"{}", None, &secret()),
            Err(WebhookError::MissingHeader)
        ));
    }

    #[test]
    fn test_parse_event_decodes_envelope() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#;
        let now = Utc::now();
        let header = format!("t={},v1={}", now.timestamp(), sign(payload, now.timestamp()));

        let event = parse_event(payload, Some(&header), &secret()).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
    }
}

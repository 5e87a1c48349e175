//! Lulu OAuth2 client-credentials authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::LuluError;

/// Token endpoint path under the API base.
const TOKEN_PATH: &str = "/auth/realms/glasstree/protocol/openid-connect/token";

/// Safety margin: a token is treated as expired this many seconds before the
/// server-reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 300;

/// A cached Lulu access token.
#[derive(Debug, Clone)]
pub struct LuluToken {
    /// Bearer token for API requests.
    pub access_token: SecretString,
    /// Unix timestamp when the token is considered expired (margin applied).
    pub expires_at: i64,
}

impl LuluToken {
    /// Build a token from the endpoint's `expires_in`, applying the safety
    /// margin.
    #[must_use]
    pub fn new(access_token: String, expires_in: i64, now: i64) -> Self {
        Self {
            access_token: SecretString::from(access_token),
            expires_at: now + expires_in - EXPIRY_MARGIN_SECS,
        }
    }

    /// Whether the token should no longer be used.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

/// Obtain an access token with the client-credentials grant.
///
/// # Errors
///
/// Returns `LuluError::AuthenticationFailed` if the token endpoint rejects
/// the credentials and `LuluError::Http` on transport failures.
#[instrument(skip(client, client_secret))]
pub async fn authenticate(
    client: &reqwest::Client,
    api_url: &str,
    client_key: &str,
    client_secret: &SecretString,
) -> Result<LuluToken, LuluError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(format!("{api_url}{TOKEN_PATH}"))
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_key),
            ("client_secret", client_secret.expose_secret()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_owned());
        return Err(LuluError::AuthenticationFailed(format!(
            "HTTP {status}: {body}"
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(LuluToken::new(token.access_token, token.expires_in, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry_margin() {
        let now = 1_700_000_000;
        let token = LuluToken::new("abc".to_owned(), 3600, now);

        // Valid well inside the window
        assert!(!token.is_expired(now));
        assert!(!token.is_expired(now + 3000));

        // The margin kicks in 300 seconds early
        assert!(token.is_expired(now + 3300));
        assert!(token.is_expired(now + 3600));
    }

    #[test]
    fn test_short_lived_token_is_immediately_expired() {
        // A token shorter than the margin is never considered usable; the
        // client will simply fetch a fresh one per request.
        let now = 1_700_000_000;
        let token = LuluToken::new("abc".to_owned(), 120, now);
        assert!(token.is_expired(now));
    }
}

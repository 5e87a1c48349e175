//! Lulu REST API client with in-memory token caching.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::instrument;

use advice_for_life_core::ProductType;

use super::LuluError;
use super::auth::{LuluToken, authenticate};
use super::types::{Paginated, PrintJob, PrintJobRequest};
use crate::config::LuluConfig;

/// Lulu REST API client.
///
/// # Authentication
///
/// Uses OAuth2 client-credentials tokens. Tokens are cached in memory and
/// re-fetched transparently once they get close to expiry; unlike
/// refresh-token schemes, the client-credentials grant can always mint a new
/// token, so there is no separate refresh path.
#[derive(Clone)]
pub struct LuluClient {
    inner: Arc<LuluClientInner>,
}

struct LuluClientInner {
    client: reqwest::Client,
    config: LuluConfig,
    /// In-memory token cache
    token: RwLock<Option<LuluToken>>,
}

impl LuluClient {
    /// Create a new Lulu API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &LuluConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(LuluClientInner {
                client,
                config: config.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// POD package id for a product type (hardback spec for the bundle).
    #[must_use]
    pub fn pod_package_id(&self, product_type: ProductType) -> &str {
        match product_type {
            ProductType::Paperback => &self.inner.config.paperback_pod_package_id,
            _ => &self.inner.config.hardback_pod_package_id,
        }
    }

    /// Interior PDF URL used for print jobs.
    #[must_use]
    pub fn interior_pdf_url(&self) -> &str {
        &self.inner.config.interior_pdf_url
    }

    /// Cover PDF URL used for print jobs.
    #[must_use]
    pub fn cover_pdf_url(&self) -> &str {
        &self.inner.config.cover_pdf_url
    }

    /// Get a usable bearer token, fetching a fresh one if needed.
    async fn access_token(&self) -> Result<String, LuluError> {
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired(now)
        {
            return Ok(token.access_token.expose_secret().to_owned());
        }

        // Token missing or stale; take the write lock and re-check, so
        // concurrent requests don't all hit the token endpoint.
        let mut guard = self.inner.token.write().await;
        if let Some(token) = guard.as_ref()
            && !token.is_expired(now)
        {
            return Ok(token.access_token.expose_secret().to_owned());
        }

        let token = authenticate(
            &self.inner.client,
            &self.inner.config.api_url,
            &self.inner.config.client_key,
            &self.inner.config.client_secret,
        )
        .await?;
        let access_token = token.access_token.expose_secret().to_owned();
        *guard = Some(token);

        Ok(access_token)
    }

    /// Create a print job.
    ///
    /// # Errors
    ///
    /// Returns `LuluError::AuthenticationFailed` if a token cannot be
    /// obtained, `LuluError::Api` if Lulu rejects the job, and
    /// `LuluError::Http` on transport failures.
    #[instrument(skip(self, request), fields(contact_email = %request.contact_email))]
    pub async fn create_print_job(
        &self,
        request: &PrintJobRequest,
    ) -> Result<PrintJob, LuluError> {
        let token = self.access_token().await?;

        let response = self
            .inner
            .client
            .post(format!("{}/print-jobs/", self.inner.config.api_url))
            .bearer_auth(token)
            .header("Cache-Control", "no-cache")
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Get a print job's current status.
    ///
    /// # Errors
    ///
    /// Returns `LuluError::Api` if Lulu rejects the request (including
    /// unknown ids) and `LuluError::Http` on transport failures.
    #[instrument(skip(self))]
    pub async fn print_job(&self, print_job_id: i64) -> Result<PrintJob, LuluError> {
        let token = self.access_token().await?;

        let response = self
            .inner
            .client
            .get(format!(
                "{}/print-jobs/{print_job_id}/",
                self.inner.config.api_url
            ))
            .bearer_auth(token)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        Self::decode(response).await
    }

    /// List available POD packages (product specifications).
    ///
    /// Used from the admin panel to find the right package id for new book
    /// specs; the payload is passed through untyped.
    ///
    /// # Errors
    ///
    /// Returns `LuluError::Api` if Lulu rejects the request and
    /// `LuluError::Http` on transport failures.
    #[instrument(skip(self))]
    pub async fn pod_packages(&self) -> Result<Vec<serde_json::Value>, LuluError> {
        let token = self.access_token().await?;

        let response = self
            .inner
            .client
            .get(format!("{}/pod-packages/", self.inner.config.api_url))
            .bearer_auth(token)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;

        let page: Paginated<serde_json::Value> = Self::decode(response).await?;
        Ok(page.results)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LuluError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_owned());
        Err(LuluError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> LuluConfig {
        LuluConfig {
            client_key: "key".to_owned(),
            client_secret: SecretString::from("secret"),
            api_url: "https://api.sandbox.lulu.com".to_owned(),
            hardback_pod_package_id: "HARDBACK_PKG".to_owned(),
            paperback_pod_package_id: "PAPERBACK_PKG".to_owned(),
            interior_pdf_url: "https://cdn.test/interior.pdf".to_owned(),
            cover_pdf_url: "https://cdn.test/cover.pdf".to_owned(),
        }
    }

    #[test]
    fn test_pod_package_selection() {
        let client = LuluClient::new(&config());

        assert_eq!(
            client.pod_package_id(ProductType::Paperback),
            "PAPERBACK_PKG"
        );
        assert_eq!(client.pod_package_id(ProductType::Hardback), "HARDBACK_PKG");
        // The bundle ships the premium edition
        assert_eq!(client.pod_package_id(ProductType::Bundle), "HARDBACK_PKG");
    }

    #[test]
    fn test_client_starts_without_token() {
        let client = LuluClient::new(&config());
        assert!(client.inner.token.blocking_read().is_none());
    }
}

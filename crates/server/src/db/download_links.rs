//! Download link repository.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sqlx::PgPool;

use advice_for_life_core::{DownloadLinkId, OrderId};

use super::RepositoryError;
use crate::models::DownloadLink;

/// Random bytes per token; 32 bytes -> 43 URL-safe base64 characters.
const TOKEN_BYTES: usize = 32;

/// Generate a fresh download token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Raw database row for a download link.
#[derive(sqlx::FromRow)]
struct DownloadLinkRow {
    id: DownloadLinkId,
    order_id: OrderId,
    token: String,
    expires_at: DateTime<Utc>,
    downloads: i32,
    max_downloads: i32,
    created_at: DateTime<Utc>,
}

impl From<DownloadLinkRow> for DownloadLink {
    fn from(row: DownloadLinkRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            token: row.token,
            expires_at: row.expires_at,
            downloads: row.downloads,
            max_downloads: row.max_downloads,
            created_at: row.created_at,
        }
    }
}

/// Repository for download link database operations.
pub struct DownloadLinkRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DownloadLinkRepository<'a> {
    /// Create a new download link repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a download link for an order with a freshly generated token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        order_id: OrderId,
        expires_at: DateTime<Utc>,
    ) -> Result<DownloadLink, RepositoryError> {
        let row = sqlx::query_as::<_, DownloadLinkRow>(
            "INSERT INTO download_links (order_id, token, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, order_id, token, expires_at, downloads, max_downloads, created_at",
        )
        .bind(order_id)
        .bind(generate_token())
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Look up a download link by its token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<DownloadLink>, RepositoryError> {
        let row = sqlx::query_as::<_, DownloadLinkRow>(
            "SELECT id, order_id, token, expires_at, downloads, max_downloads, created_at \
             FROM download_links WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the most recent download link for an order, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_latest_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<DownloadLink>, RepositoryError> {
        let row = sqlx::query_as::<_, DownloadLinkRow>(
            "SELECT id, order_id, token, expires_at, downloads, max_downloads, created_at \
             FROM download_links WHERE order_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Increment the download counter for a link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the link does not exist.
    pub async fn increment_downloads(&self, id: DownloadLinkId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE download_links SET downloads = downloads + 1 WHERE id = $1")
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        // 32 bytes of URL-safe base64 without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_token_is_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}

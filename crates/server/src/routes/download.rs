//! Download token redemption.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use advice_for_life_core::{DownloadKind, ProductType};

use crate::db::{DownloadLinkRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for download redemption.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// The file a download link serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DownloadAsset {
    /// File name inside the assets directory.
    file_name: &'static str,
    content_type: &'static str,
    /// File name offered to the browser.
    download_name: &'static str,
}

const EBOOK_ASSET: DownloadAsset = DownloadAsset {
    file_name: "advice-for-life-ebook.pdf",
    content_type: "application/pdf",
    download_name: "Advice-for-Life-from-a-Drug-Addict.pdf",
};

/// Audiobook + bonus material + ebook, packaged at deploy time.
const PACKAGE_ASSET: DownloadAsset = DownloadAsset {
    file_name: "advice-for-life-complete-package.zip",
    content_type: "application/zip",
    download_name: "Advice-for-Life-Complete-Package.zip",
};

const fn asset_for(product_type: ProductType) -> DownloadAsset {
    match product_type.download_kind() {
        DownloadKind::Ebook => EBOOK_ASSET,
        DownloadKind::CompletePackage => PACKAGE_ASSET,
    }
}

/// Redeem a download token.
///
/// GET /api/download?token=...
///
/// Gate order: missing token (400), unknown token (404), expired (410),
/// limit reached (403). A successful redemption increments the counter
/// before the bytes go out.
#[instrument(skip(state, query))]
pub async fn redeem(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Download token is required".to_owned()))?;

    let links = DownloadLinkRepository::new(state.pool());
    let link = links
        .get_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid or expired download link".to_owned()))?;

    if link.is_expired(Utc::now()) {
        return Err(AppError::Gone("Download link has expired".to_owned()));
    }
    if link.is_exhausted() {
        return Err(AppError::Forbidden("Download limit reached".to_owned()));
    }

    links.increment_downloads(link.id).await?;

    let order = OrderRepository::new(state.pool())
        .get_by_id(link.order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    let asset = asset_for(order.product_type);
    let path = state.config().assets_dir.join(asset.file_name);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Download asset unreadable");
        AppError::Internal(format!("missing download asset: {}", asset.file_name))
    })?;

    tracing::info!(
        link_id = %link.id,
        order_id = %order.id,
        product = %order.product_type,
        downloads = link.downloads + 1,
        "Download served"
    );

    let headers = [
        (header::CONTENT_TYPE, asset.content_type.to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", asset.download_name),
        ),
        (header::CACHE_CONTROL, "no-store".to_owned()),
    ];

    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_selection() {
        assert_eq!(asset_for(ProductType::Pdf), EBOOK_ASSET);
        assert_eq!(asset_for(ProductType::Audiobook), PACKAGE_ASSET);
        assert_eq!(asset_for(ProductType::Bundle), PACKAGE_ASSET);
        // Physical editions fall back to the ebook for manually issued links
        assert_eq!(asset_for(ProductType::Paperback), EBOOK_ASSET);
        assert_eq!(asset_for(ProductType::Hardback), EBOOK_ASSET);
    }
}

//! Admin print-vendor endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use advice_for_life_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Order;
use crate::services::fulfillment::refresh_print_job_status;
use crate::state::AppState;

/// How many matching packages are echoed back in full.
const PACKAGE_PREVIEW_LIMIT: usize = 20;

/// POD package listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodPackagesResponse {
    pub success: bool,
    pub total_packages: usize,
    pub hardcover_packages: usize,
    /// First matching hardcover specs, for picking a package id.
    pub packages: Vec<serde_json::Value>,
}

/// List Lulu POD packages, filtered to hardcover specs.
///
/// GET /api/admin/print/packages
///
/// Used when changing book specs to find the right package id without
/// digging through Lulu's catalog by hand.
#[instrument(skip(state, _admin))]
pub async fn pod_packages(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<PodPackagesResponse>> {
    let packages = state.lulu().pod_packages().await?;

    let hardcover: Vec<serde_json::Value> = packages
        .iter()
        .filter(|package| {
            package
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_lowercase)
                .is_some_and(|name| {
                    name.contains("hardcover")
                        || name.contains("casewrap")
                        || name.contains("hardback")
                })
        })
        .cloned()
        .collect();

    Ok(Json(PodPackagesResponse {
        success: true,
        total_packages: packages.len(),
        hardcover_packages: hardcover.len(),
        packages: hardcover.into_iter().take(PACKAGE_PREVIEW_LIMIT).collect(),
    }))
}

/// Re-poll a print job and persist its status and tracking info.
///
/// POST /api/admin/print/orders/{id}/refresh
#[instrument(skip(state, admin), fields(order_id = %id))]
pub async fn refresh_print_job(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    refresh_print_job_status(&state, &order).await?;
    tracing::info!(order_id = %id, admin = %admin.email, "Print job refreshed");

    let refreshed = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;
    Ok(Json(refreshed))
}

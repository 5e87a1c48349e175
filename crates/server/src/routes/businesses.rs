//! Business tracker CRUD.
//!
//! Listing is public (it powers the landing-page tracker); create, update,
//! and delete require an admin session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use advice_for_life_core::{BusinessId, BusinessStatus};

use crate::db::BusinessRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{Business, BusinessUpdate, NewBusiness};
use crate::state::AppState;

/// Distinguish "field absent" from "field set to null" in PATCH bodies:
/// absent leaves the column alone, null clears it.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Public listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListResponse {
    pub businesses: Vec<Business>,
    pub total_count: usize,
    pub active_count: usize,
}

/// Create request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub status: Option<BusinessStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Partial update body.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub website_link: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<BusinessStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub milestone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Mutation response: a message plus the affected row.
#[derive(Debug, Serialize)]
pub struct BusinessMutationResponse {
    pub message: String,
    pub business: Business,
}

/// List all businesses with counts.
///
/// GET /api/businesses
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<BusinessListResponse>> {
    let businesses = BusinessRepository::new(state.pool()).list().await?;
    let active_count = businesses
        .iter()
        .filter(|b| b.status == BusinessStatus::Active)
        .count();

    Ok(Json(BusinessListResponse {
        total_count: businesses.len(),
        active_count,
        businesses,
    }))
}

/// Create a business.
///
/// POST /api/businesses (admin)
#[instrument(skip(state, admin, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<BusinessMutationResponse>)> {
    let (Some(name), Some(description), Some(launch_date)) =
        (body.name, body.description, body.launch_date)
    else {
        return Err(AppError::Validation(
            "Name, description, and launch date are required".to_owned(),
        ));
    };

    let business = BusinessRepository::new(state.pool())
        .create(&NewBusiness {
            name,
            description,
            launch_date,
            website_link: body.website_link,
            status: body.status.unwrap_or_default(),
            category: body.category,
            milestone: body.milestone,
            image_url: body.image_url,
            position: body.position.unwrap_or(0),
            created_by: Some(admin.id),
        })
        .await?;

    tracing::info!(business_id = %business.id, admin = %admin.email, "Business created");

    Ok((
        StatusCode::CREATED,
        Json(BusinessMutationResponse {
            message: "Business created successfully".to_owned(),
            business,
        }),
    ))
}

/// Update a business.
///
/// PATCH /api/businesses/{id} (admin)
#[instrument(skip(state, admin, body), fields(business_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BusinessId>,
    Json(body): Json<UpdateBusinessRequest>,
) -> Result<Json<BusinessMutationResponse>> {
    let update = BusinessUpdate {
        name: body.name,
        description: body.description,
        launch_date: body.launch_date,
        website_link: body.website_link,
        status: body.status,
        category: body.category,
        milestone: body.milestone,
        image_url: body.image_url,
        position: body.position,
    };

    if update.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_owned()));
    }

    let business = BusinessRepository::new(state.pool()).update(id, &update).await?;
    tracing::info!(business_id = %business.id, admin = %admin.email, "Business updated");

    Ok(Json(BusinessMutationResponse {
        message: "Business updated successfully".to_owned(),
        business,
    }))
}

/// Delete a business.
///
/// DELETE /api/businesses/{id} (admin)
#[instrument(skip(state, admin), fields(business_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BusinessId>,
) -> Result<Json<serde_json::Value>> {
    BusinessRepository::new(state.pool()).delete(id).await?;
    tracing::info!(business_id = %id, admin = %admin.email, "Business deleted");

    Ok(Json(
        serde_json::json!({ "message": "Business deleted successfully" }),
    ))
}

//! Business idea submission and review.
//!
//! Submission and the total count are public (they power the landing-page
//! form and its counter); listing, review, and deletion require an admin
//! session.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use advice_for_life_core::{BusinessIdeaId, Email, IdeaStatus};

use crate::db::BusinessIdeaRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{BusinessIdea, IdeaReview, NewBusinessIdea};
use crate::state::AppState;

/// Public submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitIdeaRequest {
    #[serde(default)]
    pub submitter_name: Option<String>,
    #[serde(default)]
    pub submitter_email: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub why_it_matters: Option<String>,
}

/// Public submission response.
#[derive(Debug, Serialize)]
pub struct SubmitIdeaResponse {
    pub success: bool,
    pub message: String,
    pub id: BusinessIdeaId,
}

/// Admin list query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Admin list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaListResponse {
    pub business_ideas: Vec<BusinessIdea>,
    /// Submissions per review status (zero counts included).
    pub status_counts: std::collections::BTreeMap<&'static str, i64>,
    pub total_count: i64,
}

/// Admin review body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIdeaRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub equity_percentage: Option<Decimal>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Submit a business idea.
///
/// POST /api/business-ideas
#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<SubmitIdeaRequest>,
) -> Result<(StatusCode, Json<SubmitIdeaResponse>)> {
    let (
        Some(submitter_name),
        Some(submitter_email),
        Some(business_name),
        Some(description),
        Some(why_it_matters),
    ) = (
        required(body.submitter_name),
        required(body.submitter_email),
        required(body.business_name),
        required(body.description),
        required(body.why_it_matters),
    )
    else {
        return Err(AppError::Validation("All fields are required".to_owned()));
    };

    let submitter_email = Email::parse_normalized(&submitter_email)
        .map_err(|_| AppError::Validation("Invalid email address".to_owned()))?;

    let idea = BusinessIdeaRepository::new(state.pool())
        .create(&NewBusinessIdea {
            submitter_name,
            submitter_email,
            business_name,
            description,
            why_it_matters,
        })
        .await?;

    tracing::info!(idea_id = %idea.id, "Business idea submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitIdeaResponse {
            success: true,
            message: "Business idea submitted successfully!".to_owned(),
            id: idea.id,
        }),
    ))
}

/// List submissions with per-status counts.
///
/// GET /api/business-ideas?status=... (admin)
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<IdeaListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<IdeaStatus>)
        .transpose()
        .map_err(|_| AppError::Validation("Invalid status".to_owned()))?;

    let repo = BusinessIdeaRepository::new(state.pool());
    let business_ideas = repo.list(status).await?;

    let mut status_counts: std::collections::BTreeMap<&'static str, i64> =
        IdeaStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut total_count = 0;
    for entry in repo.status_counts().await? {
        status_counts.insert(entry.status.as_str(), entry.count);
        total_count += entry.count;
    }

    Ok(Json(IdeaListResponse {
        business_ideas,
        status_counts,
        total_count,
    }))
}

/// Public total submission count.
///
/// GET /api/business-ideas/count
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let total = BusinessIdeaRepository::new(state.pool()).count().await?;
    Ok(Json(serde_json::json!({ "totalCount": total })))
}

/// Review a submission (status, equity, notes).
///
/// PATCH /api/business-ideas/{id} (admin)
#[instrument(skip(state, admin, body), fields(idea_id = %id))]
pub async fn review(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BusinessIdeaId>,
    Json(body): Json<ReviewIdeaRequest>,
) -> Result<Json<BusinessIdea>> {
    let status = body
        .status
        .as_deref()
        .map(str::parse::<IdeaStatus>)
        .transpose()
        .map_err(|_| AppError::Validation("Invalid status".to_owned()))?;

    let review = IdeaReview {
        status,
        equity_percentage: body.equity_percentage,
        admin_notes: body.admin_notes,
    };

    if review.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_owned()));
    }

    let idea = BusinessIdeaRepository::new(state.pool())
        .review(id, &review, admin.email.as_str())
        .await?;

    tracing::info!(idea_id = %idea.id, status = %idea.status, admin = %admin.email, "Idea reviewed");
    Ok(Json(idea))
}

/// Delete a submission.
///
/// DELETE /api/business-ideas/{id} (admin)
#[instrument(skip(state, admin), fields(idea_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BusinessIdeaId>,
) -> Result<Json<serde_json::Value>> {
    BusinessIdeaRepository::new(state.pool()).delete(id).await?;
    tracing::info!(idea_id = %id, admin = %admin.email, "Idea deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}

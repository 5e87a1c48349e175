//! Business idea submission domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use advice_for_life_core::{BusinessIdeaId, Email, IdeaStatus};

/// A visitor-submitted business idea.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdea {
    pub id: BusinessIdeaId,
    pub submitter_name: String,
    pub submitter_email: Email,
    pub business_name: String,
    pub description: String,
    pub why_it_matters: String,
    pub status: IdeaStatus,
    /// Equity offered to the submitter if the idea is selected.
    pub equity_percentage: Option<Decimal>,
    pub admin_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Email of the admin who last reviewed the submission.
    pub reviewed_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an idea submission.
#[derive(Debug, Clone)]
pub struct NewBusinessIdea {
    pub submitter_name: String,
    pub submitter_email: Email,
    pub business_name: String,
    pub description: String,
    pub why_it_matters: String,
}

/// Admin review update. `None` fields are left unchanged; a status change
/// also stamps `reviewed_at`/`reviewed_by`.
#[derive(Debug, Clone, Default)]
pub struct IdeaReview {
    pub status: Option<IdeaStatus>,
    pub equity_percentage: Option<Decimal>,
    pub admin_notes: Option<String>,
}

impl IdeaReview {
    /// Whether the review would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.equity_percentage.is_none() && self.admin_notes.is_none()
    }
}

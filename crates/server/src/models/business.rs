//! Business tracker domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use advice_for_life_core::{AdminUserId, BusinessId, BusinessStatus};

/// A business shown on the public tracker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub description: String,
    pub launch_date: NaiveDate,
    pub website_link: Option<String>,
    pub status: BusinessStatus,
    pub category: Option<String>,
    pub milestone: Option<String>,
    pub image_url: Option<String>,
    /// Display position on the tracker (ascending).
    pub position: i32,
    pub created_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a business.
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub name: String,
    pub description: String,
    pub launch_date: NaiveDate,
    pub website_link: Option<String>,
    pub status: BusinessStatus,
    pub category: Option<String>,
    pub milestone: Option<String>,
    pub image_url: Option<String>,
    pub position: i32,
    pub created_by: Option<AdminUserId>,
}

/// Partial update for a business. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BusinessUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub launch_date: Option<NaiveDate>,
    pub website_link: Option<Option<String>>,
    pub status: Option<BusinessStatus>,
    pub category: Option<Option<String>>,
    pub milestone: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub position: Option<i32>,
}

impl BusinessUpdate {
    /// Whether the update would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.launch_date.is_none()
            && self.website_link.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.milestone.is_none()
            && self.image_url.is_none()
            && self.position.is_none()
    }
}

//! Newsletter subscriber and contact submission domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use advice_for_life_core::{ContactSubmissionId, Email, SubscriberId};

/// A newsletter subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct EmailSubscriber {
    pub id: SubscriberId,
    pub email: Email,
    /// Where the address came from: `newsletter`, `purchase`, or a custom
    /// form source.
    pub source: String,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contact form submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: ContactSubmissionId,
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

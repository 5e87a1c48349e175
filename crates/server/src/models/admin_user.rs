//! Admin user domain types and session payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use advice_for_life_core::{AdminRole, AdminUserId, Email};

/// An admin user (domain type). The password hash never leaves the
/// repository layer.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The admin identity stored in the session cookie after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Keys used for session storage.
pub mod session_keys {
    /// Session key for the logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

//! Status enums for persisted entities.
//!
//! All of these are stored as text columns; `as_str`/`FromStr` define the
//! canonical database and wire forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseStatusError {
    /// Which enum failed to parse (for error messages).
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

impl ParseStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Payment status of an order.
///
/// Orders are only materialized from paid checkout sessions, so `Completed`
/// is the normal state; `Refunded` is set manually when a payment is
/// reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Completed,
    Refunded,
}

impl OrderStatus {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "refunded" => Ok(Self::Refunded),
            other => Err(ParseStatusError::new("order status", other)),
        }
    }
}

/// Review status of a visitor-submitted business idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Pending,
    UnderReview,
    Selected,
    Rejected,
}

impl IdeaStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::UnderReview,
        Self::Selected,
        Self::Rejected,
    ];

    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdeaStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "under_review" => Ok(Self::UnderReview),
            "selected" => Ok(Self::Selected),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError::new("idea status", other)),
        }
    }
}

/// Lifecycle status of a tracked business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    #[default]
    Active,
    Paused,
    Retired,
}

impl BusinessStatus {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Retired => "retired",
        }
    }
}

impl fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BusinessStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "retired" => Ok(Self::Retired),
            other => Err(ParseStatusError::new("business status", other)),
        }
    }
}

/// Permission level of an admin user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

impl AdminRole {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(ParseStatusError::new("admin role", other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_status_roundtrip() {
        for status in IdeaStatus::ALL {
            let parsed: IdeaStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_idea_status_snake_case_wire_form() {
        assert_eq!(IdeaStatus::UnderReview.as_str(), "under_review");
        let json = serde_json::to_string(&IdeaStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under_review\"");
    }

    #[test]
    fn test_unknown_status_error_names_the_kind() {
        let err = "shipped".parse::<IdeaStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown idea status: shipped");
    }

    #[test]
    fn test_business_status_roundtrip() {
        for status in [
            BusinessStatus::Active,
            BusinessStatus::Paused,
            BusinessStatus::Retired,
        ] {
            let parsed: BusinessStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_admin_role_roundtrip() {
        assert_eq!("admin".parse::<AdminRole>().unwrap(), AdminRole::Admin);
        assert_eq!(
            "super_admin".parse::<AdminRole>().unwrap(),
            AdminRole::SuperAdmin
        );
        assert!("viewer".parse::<AdminRole>().is_err());
    }
}

//! Wire types for the Lulu print API.

use serde::{Deserialize, Serialize};

use crate::models::ShippingAddress;

/// Fallback phone number; Lulu requires one and Stripe checkout only
/// collects it for some sessions.
pub const FALLBACK_PHONE: &str = "0000000000";

/// A shipping address in Lulu's shape.
#[derive(Debug, Clone, Serialize)]
pub struct LuluAddress {
    pub name: String,
    pub street1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state_code: String,
    pub postcode: String,
    pub country_code: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl LuluAddress {
    /// Convert the stored checkout shipping address into Lulu's shape.
    #[must_use]
    pub fn from_shipping(
        address: &ShippingAddress,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Self {
        Self {
            name: address.name.clone(),
            street1: address.line1.clone(),
            street2: address.line2.clone(),
            city: address.city.clone(),
            state_code: address.state.clone(),
            postcode: address.postal_code.clone(),
            country_code: address.country.clone(),
            phone_number: phone
                .filter(|p| !p.is_empty())
                .unwrap_or(FALLBACK_PHONE)
                .to_owned(),
            email: email.map(ToOwned::to_owned),
        }
    }
}

/// A line item in a print job request.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJobLineItem {
    pub title: String,
    /// URL to the cover PDF (must be publicly reachable by Lulu).
    pub cover: String,
    /// URL to the interior PDF (must be publicly reachable by Lulu).
    pub interior: String,
    /// Product specification id (trim size, paper, binding).
    pub pod_package_id: String,
    pub quantity: u32,
}

/// A print job creation request.
#[derive(Debug, Clone, Serialize)]
pub struct PrintJobRequest {
    pub line_items: Vec<PrintJobLineItem>,
    pub shipping_address: LuluAddress,
    /// Shipping service level (`MAIL`, `PRIORITY_MAIL`, `GROUND`, ...).
    pub shipping_level: String,
    pub contact_email: String,
}

/// A print job as returned by Lulu.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintJob {
    pub id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub line_items: Vec<PrintJobLineItemStatus>,
}

impl PrintJob {
    /// Tracking id of the first shipped line item, if any.
    #[must_use]
    pub fn tracking_id(&self) -> Option<&str> {
        self.line_items.iter().find_map(|li| li.tracking_id.as_deref())
    }

    /// Tracking URL of the first shipped line item, if any.
    #[must_use]
    pub fn tracking_url(&self) -> Option<&str> {
        self.line_items.iter().find_map(|li| li.tracking_url.as_deref())
    }
}

/// Per-line-item status within a print job.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintJobLineItemStatus {
    pub id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

/// Paginated listing envelope used by Lulu collection endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            name: "Jordan Reed".to_owned(),
            line1: "1 Main St".to_owned(),
            line2: Some("Apt 2".to_owned()),
            city: "Phoenix".to_owned(),
            state: "AZ".to_owned(),
            postal_code: "85001".to_owned(),
            country: "US".to_owned(),
        }
    }

    #[test]
    fn test_address_conversion() {
        let address =
            LuluAddress::from_shipping(&shipping(), Some("+15550100"), Some("buyer@example.com"));
        assert_eq!(address.street1, "1 Main St");
        assert_eq!(address.street2.as_deref(), Some("Apt 2"));
        assert_eq!(address.state_code, "AZ");
        assert_eq!(address.postcode, "85001");
        assert_eq!(address.country_code, "US");
        assert_eq!(address.phone_number, "+15550100");
    }

    #[test]
    fn test_address_phone_fallback() {
        let address = LuluAddress::from_shipping(&shipping(), None, None);
        assert_eq!(address.phone_number, FALLBACK_PHONE);

        let address = LuluAddress::from_shipping(&shipping(), Some(""), None);
        assert_eq!(address.phone_number, FALLBACK_PHONE);
    }

    #[test]
    fn test_print_job_tracking_from_line_items() {
        let job: PrintJob = serde_json::from_value(serde_json::json!({
            "id": 99,
            "status": "SHIPPED",
            "line_items": [
                {"id": 1, "status": "SHIPPED", "tracking_id": "TRACK1",
                 "tracking_url": "https://track.test/TRACK1"}
            ]
        }))
        .unwrap();

        assert_eq!(job.tracking_id(), Some("TRACK1"));
        assert_eq!(job.tracking_url(), Some("https://track.test/TRACK1"));
    }

    #[test]
    fn test_print_job_without_tracking() {
        let job: PrintJob =
            serde_json::from_value(serde_json::json!({"id": 1, "status": "CREATED"})).unwrap();
        assert_eq!(job.tracking_id(), None);
        assert!(job.line_items.is_empty());
    }
}

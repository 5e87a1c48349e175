//! Order and download-link domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use advice_for_life_core::{DownloadLinkId, OrderId, OrderStatus, ProductType};

/// Shipping address captured from Stripe checkout.
///
/// Stored as JSONB on the order row; the field names are the wire form used
/// by both the success page and the Lulu submission path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A paid order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Customer email as reported by Stripe (may be empty for malformed
    /// sessions; never trusted as a validated [`advice_for_life_core::Email`]).
    pub email: String,
    pub customer_name: String,
    /// Total charged, in cents.
    pub amount: i64,
    pub status: OrderStatus,
    pub stripe_session_id: String,
    pub stripe_payment_intent_id: String,
    pub product_type: ProductType,
    pub shipping_address: Option<ShippingAddress>,
    pub phone: Option<String>,
    /// "How did you hear about the book" checkout dropdown, when present.
    pub acquisition_source: Option<String>,
    pub company_name: Option<String>,
    pub lulu_print_job_id: Option<i64>,
    pub lulu_print_job_status: Option<String>,
    pub lulu_tracking_id: Option<String>,
    pub lulu_tracking_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub email: String,
    pub customer_name: String,
    pub amount: i64,
    pub stripe_session_id: String,
    pub stripe_payment_intent_id: String,
    pub product_type: ProductType,
    pub shipping_address: Option<ShippingAddress>,
    pub phone: Option<String>,
    pub acquisition_source: Option<String>,
    pub company_name: Option<String>,
}

/// A tokenized download link for a digital product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub id: DownloadLinkId,
    pub order_id: OrderId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub downloads: i32,
    pub max_downloads: i32,
    pub created_at: DateTime<Utc>,
}

impl DownloadLink {
    /// Whether the link has passed its expiry time.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the download counter has reached its cap.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.downloads >= self.max_downloads
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(downloads: i32, max_downloads: i32, expires_in_hours: i64) -> DownloadLink {
        let now = Utc::now();
        DownloadLink {
            id: DownloadLinkId::generate(),
            order_id: OrderId::generate(),
            token: "token".to_owned(),
            expires_at: now + Duration::hours(expires_in_hours),
            downloads,
            max_downloads,
            created_at: now,
        }
    }

    #[test]
    fn test_link_expiry() {
        let now = Utc::now();
        assert!(!link(0, 3, 1).is_expired(now));
        assert!(link(0, 3, -1).is_expired(now));
    }

    #[test]
    fn test_link_exhaustion() {
        assert!(!link(2, 3, 1).is_exhausted());
        assert!(link(3, 3, 1).is_exhausted());
        assert!(link(4, 3, 1).is_exhausted());
    }

    #[test]
    fn test_shipping_address_wire_form() {
        let address = ShippingAddress {
            name: "Jordan Reed".to_owned(),
            line1: "1 Main St".to_owned(),
            line2: None,
            city: "Phoenix".to_owned(),
            state: "AZ".to_owned(),
            postal_code: "85001".to_owned(),
            country: "US".to_owned(),
        };

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["postal_code"], "85001");

        // line2 may be absent entirely in stored rows
        let parsed: ShippingAddress = serde_json::from_str(
            r#"{"name":"J","line1":"1 Main St","city":"Phoenix","state":"AZ","postal_code":"85001","country":"US"}"#,
        )
        .unwrap();
        assert_eq!(parsed.line2, None);
    }
}

//! Wire types for the Stripe API surface this site uses.
//!
//! Stripe objects are large; only the fields the handlers read are modeled,
//! everything else is ignored during deserialization. Most fields are
//! `Option` because Stripe omits them depending on session mode and payment
//! state.

use std::collections::HashMap;

use serde::Deserialize;

use advice_for_life_core::ProductType;

/// A Stripe Checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page URL (present on freshly created sessions).
    #[serde(default)]
    pub url: Option<String>,
    /// `paid`, `unpaid`, or `no_payment_required`.
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Total in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub shipping_details: Option<ShippingDetails>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// Customer contact details collected by checkout.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Shipping details collected by checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// A Stripe address.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Address {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A custom checkout field (dropdown or free text).
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub key: String,
    #[serde(default)]
    pub dropdown: Option<DropdownValue>,
    #[serde(default)]
    pub text: Option<TextValue>,
}

/// Selected value of a dropdown custom field.
#[derive(Debug, Clone, Deserialize)]
pub struct DropdownValue {
    #[serde(default)]
    pub value: Option<String>,
}

/// Entered value of a text custom field.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    #[serde(default)]
    pub value: Option<String>,
}

impl CheckoutSession {
    /// Whether Stripe reports this session as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }

    /// Product type from session metadata, defaulting to the PDF edition
    /// when the metadata is missing or unparseable.
    #[must_use]
    pub fn product_type(&self) -> ProductType {
        self.metadata
            .get("product")
            .and_then(|p| p.parse().ok())
            .unwrap_or(ProductType::Pdf)
    }

    /// Customer email, if checkout collected one.
    #[must_use]
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details.as_ref()?.email.as_deref()
    }

    /// Customer name, if checkout collected one.
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_details.as_ref()?.name.as_deref()
    }

    /// Customer phone, if checkout collected one.
    #[must_use]
    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_details.as_ref()?.phone.as_deref()
    }

    /// Selected value of a dropdown custom field.
    #[must_use]
    pub fn dropdown_field(&self, key: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.key == key)?
            .dropdown
            .as_ref()?
            .value
            .as_deref()
    }

    /// Entered value of a text custom field.
    #[must_use]
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.key == key)?
            .text
            .as_ref()?
            .value
            .as_deref()
    }
}

/// A webhook event envelope.
///
/// `data.object` is kept as raw JSON; its shape depends on the event type,
/// and the webhook handler only decodes it for the types it handles.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// Payload of a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session_json() -> serde_json::Value {
        serde_json::json!({
            "id": "cs_test_123",
            "object": "checkout.session",
            "payment_status": "paid",
            "amount_total": 4199,
            "payment_intent": "pi_123",
            "metadata": {"product": "hardback", "product_name": "Hardback"},
            "customer_details": {"email": "buyer@example.com", "name": "Buyer", "phone": "+15550100"},
            "shipping_details": {
                "name": "Buyer",
                "address": {"line1": "1 Main St", "city": "Phoenix", "state": "AZ",
                            "postal_code": "85001", "country": "US"}
            },
            "custom_fields": [
                {"key": "acquisition_source", "dropdown": {"value": "podcast"}},
                {"key": "company_name", "text": {"value": "Acme"}}
            ]
        })
    }

    #[test]
    fn test_session_accessors() {
        let session: CheckoutSession = serde_json::from_value(session_json()).unwrap();
        assert!(session.is_paid());
        assert_eq!(session.product_type(), ProductType::Hardback);
        assert_eq!(session.customer_email(), Some("buyer@example.com"));
        assert_eq!(session.customer_phone(), Some("+15550100"));
        assert_eq!(session.dropdown_field("acquisition_source"), Some("podcast"));
        assert_eq!(session.text_field("company_name"), Some("Acme"));
        assert_eq!(session.dropdown_field("missing"), None);
    }

    #[test]
    fn test_minimal_session_defaults() {
        // Expired/unpaid sessions come back with most fields null or absent.
        let session: CheckoutSession =
            serde_json::from_str(r#"{"id": "cs_test_min"}"#).unwrap();
        assert!(!session.is_paid());
        assert_eq!(session.product_type(), ProductType::Pdf);
        assert_eq!(session.customer_email(), None);
        assert!(session.custom_fields.is_empty());
    }

    #[test]
    fn test_event_envelope() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": session_json()}
        }))
        .unwrap();

        assert_eq!(event.event_type, "checkout.session.completed");
        let session: CheckoutSession = serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.id, "cs_test_123");
    }
}

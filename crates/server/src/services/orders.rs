//! Order materialization from paid checkout sessions.
//!
//! Two paths converge here: the payment webhook and the success page's
//! order-details fallback (which wins the race when the webhook is slow).
//! Both upsert on the Stripe session id, and only the caller that actually
//! inserted the row creates the download link and subscriber record.

use chrono::{Duration, Utc};

use advice_for_life_core::Email;

use crate::error::Result;
use crate::db::{DownloadLinkRepository, OrderRepository, SubscriberRepository};
use crate::models::{NewOrder, Order, ShippingAddress};
use crate::state::AppState;
use crate::stripe::CheckoutSession;

/// Download links are valid for a week.
pub const DOWNLOAD_LINK_TTL_DAYS: i64 = 7;

/// Result of materializing an order for a checkout session.
#[derive(Debug)]
pub struct OrderOutcome {
    pub order: Order,
    /// Whether this call created the order (false on webhook retries and
    /// webhook/success-page races).
    pub created: bool,
}

/// Extract the shipping address collected by checkout, if any.
#[must_use]
pub fn shipping_from_session(session: &CheckoutSession) -> Option<ShippingAddress> {
    let details = session.shipping_details.as_ref()?;
    let address = details.address.as_ref()?;

    let name = details
        .name
        .as_deref()
        .or_else(|| session.customer_name())
        .unwrap_or_default()
        .to_owned();

    Some(ShippingAddress {
        name,
        line1: address.line1.clone().unwrap_or_default(),
        line2: address.line2.clone().filter(|l| !l.is_empty()),
        city: address.city.clone().unwrap_or_default(),
        state: address.state.clone().unwrap_or_default(),
        postal_code: address.postal_code.clone().unwrap_or_default(),
        country: address.country.clone().unwrap_or_default(),
    })
}

/// Build an order insert from a checkout session.
#[must_use]
pub fn new_order_from_session(session: &CheckoutSession) -> NewOrder {
    NewOrder {
        email: session.customer_email().unwrap_or_default().to_owned(),
        customer_name: session.customer_name().unwrap_or_default().to_owned(),
        amount: session.amount_total.unwrap_or(0),
        stripe_session_id: session.id.clone(),
        stripe_payment_intent_id: session.payment_intent.clone().unwrap_or_default(),
        product_type: session.product_type(),
        shipping_address: shipping_from_session(session),
        phone: session.customer_phone().map(ToOwned::to_owned),
        acquisition_source: session
            .dropdown_field("acquisition_source")
            .map(ToOwned::to_owned),
        company_name: session.text_field("company_name").map(ToOwned::to_owned),
    }
}

/// Materialize the order for a paid checkout session, idempotently.
///
/// On first creation this also issues the download link (digital products)
/// and records the purchaser on the subscriber list.
///
/// # Errors
///
/// Returns `AppError::Database` if any of the writes fail.
pub async fn ensure_order_for_session(
    state: &AppState,
    session: &CheckoutSession,
) -> Result<OrderOutcome> {
    let new_order = new_order_from_session(session);
    let (order, created) = OrderRepository::new(state.pool())
        .create_if_absent(&new_order)
        .await?;

    if created {
        if order.product_type.includes_download() {
            let expires_at = Utc::now() + Duration::days(DOWNLOAD_LINK_TTL_DAYS);
            let link = DownloadLinkRepository::new(state.pool())
                .create(order.id, expires_at)
                .await?;
            tracing::info!(order_id = %order.id, link_id = %link.id, "Download link issued");
        }

        if let Ok(email) = Email::parse_normalized(&order.email) {
            SubscriberRepository::new(state.pool())
                .upsert_purchase(&email)
                .await?;
        }

        tracing::info!(
            order_id = %order.id,
            product = %order.product_type,
            amount = order.amount,
            "Order created"
        );
    } else {
        tracing::debug!(order_id = %order.id, "Order already existed for session");
    }

    Ok(OrderOutcome { order, created })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use advice_for_life_core::ProductType;

    fn paid_session() -> CheckoutSession {
        serde_json::from_value(serde_json::json!({
            "id": "cs_test_abc",
            "payment_status": "paid",
            "amount_total": 5999,
            "payment_intent": "pi_9",
            "metadata": {"product": "bundle"},
            "customer_details": {"email": "Buyer@Example.com", "name": "Buyer", "phone": "+15550100"},
            "shipping_details": {
                "name": "Recipient",
                "address": {"line1": "1 Main St", "line2": "", "city": "Phoenix",
                            "state": "AZ", "postal_code": "85001", "country": "US"}
            },
            "custom_fields": [
                {"key": "acquisition_source", "dropdown": {"value": "friend"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_new_order_from_session() {
        let order = new_order_from_session(&paid_session());
        assert_eq!(order.email, "Buyer@Example.com");
        assert_eq!(order.amount, 5999);
        assert_eq!(order.product_type, ProductType::Bundle);
        assert_eq!(order.stripe_session_id, "cs_test_abc");
        assert_eq!(order.phone.as_deref(), Some("+15550100"));
        assert_eq!(order.acquisition_source.as_deref(), Some("friend"));
        assert_eq!(order.company_name, None);
    }

    #[test]
    fn test_shipping_extraction_prefers_recipient_name() {
        let address = shipping_from_session(&paid_session()).unwrap();
        assert_eq!(address.name, "Recipient");
        assert_eq!(address.city, "Phoenix");
        // Empty line2 is normalized to None
        assert_eq!(address.line2, None);
    }

    #[test]
    fn test_shipping_name_falls_back_to_customer() {
        let mut session = paid_session();
        session.shipping_details.as_mut().unwrap().name = None;
        let address = shipping_from_session(&session).unwrap();
        assert_eq!(address.name, "Buyer");
    }

    #[test]
    fn test_digital_session_has_no_shipping() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_test_digital",
            "payment_status": "paid",
            "metadata": {"product": "pdf"}
        }))
        .unwrap();

        assert_eq!(shipping_from_session(&session), None);
        let order = new_order_from_session(&session);
        assert_eq!(order.product_type, ProductType::Pdf);
        assert!(order.shipping_address.is_none());
    }
}

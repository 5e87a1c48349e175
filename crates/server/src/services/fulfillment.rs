//! Print-on-demand fulfillment.
//!
//! Physical orders are forwarded to Lulu after payment. Submission failures
//! never fail the webhook: the error is logged, an alert email goes out if a
//! mailer is configured, and the order is handled manually.

use crate::catalog::BOOK_TITLE;
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::lulu::types::{LuluAddress, PrintJobLineItem};
use crate::lulu::{LuluError, PrintJob, PrintJobRequest};
use crate::models::Order;
use crate::state::AppState;

/// Shipping service level for all orders.
pub const SHIPPING_LEVEL: &str = "MAIL";

/// Build the print job request for a physical order.
///
/// Returns `None` when the order is not printable (digital edition, or no
/// shipping address was collected).
#[must_use]
pub fn print_job_request(state: &AppState, order: &Order) -> Option<PrintJobRequest> {
    if !order.product_type.requires_shipping() {
        return None;
    }
    let address = order.shipping_address.as_ref()?;

    let lulu = state.lulu();
    Some(PrintJobRequest {
        line_items: vec![PrintJobLineItem {
            title: BOOK_TITLE.to_owned(),
            cover: lulu.cover_pdf_url().to_owned(),
            interior: lulu.interior_pdf_url().to_owned(),
            pod_package_id: lulu.pod_package_id(order.product_type).to_owned(),
            quantity: 1,
        }],
        shipping_address: LuluAddress::from_shipping(
            address,
            order.phone.as_deref(),
            Some(&order.email),
        ),
        shipping_level: SHIPPING_LEVEL.to_owned(),
        contact_email: order.email.clone(),
    })
}

/// Submit a print job for a physical order, swallowing failures.
///
/// Called from the webhook path after order creation. Digital orders and
/// orders without a shipping address are skipped silently.
pub async fn submit_print_job(state: &AppState, order: &Order) {
    if let Some(reason) = skip_reason(order) {
        tracing::debug!(order_id = %order.id, reason, "Skipping print job");
        return;
    }
    let Some(request) = print_job_request(state, order) else {
        return;
    };

    tracing::info!(order_id = %order.id, product = %order.product_type, "Submitting print job");

    match state.lulu().create_print_job(&request).await {
        Ok(job) => {
            tracing::info!(order_id = %order.id, print_job_id = job.id, "Print job created");
            if let Err(e) = OrderRepository::new(state.pool())
                .record_print_job(order.id, job.id, &job.status)
                .await
            {
                tracing::error!(order_id = %order.id, error = %e, "Failed to record print job");
            }
        }
        Err(e) => {
            tracing::error!(order_id = %order.id, error = %e, "Print job submission failed");
            alert_print_job_failure(state, order, &e).await;
        }
    }
}

/// Re-read a print job's status from Lulu and persist it on the order.
///
/// # Errors
///
/// Returns `AppError::Validation` when the order has no print job, and the
/// usual vendor/database errors otherwise.
pub async fn refresh_print_job_status(state: &AppState, order: &Order) -> Result<PrintJob> {
    let Some(print_job_id) = order.lulu_print_job_id else {
        return Err(AppError::Validation(
            "Order has no print job to refresh".to_owned(),
        ));
    };

    let job = state.lulu().print_job(print_job_id).await?;

    OrderRepository::new(state.pool())
        .record_print_job_status(order.id, &job.status, job.tracking_id(), job.tracking_url())
        .await?;

    tracing::info!(
        order_id = %order.id,
        print_job_id,
        status = %job.status,
        "Print job status refreshed"
    );

    Ok(job)
}

async fn alert_print_job_failure(state: &AppState, order: &Order, error: &LuluError) {
    let Some(mailer) = state.mailer() else {
        return;
    };

    if let Err(mail_err) = mailer
        .send_print_job_failure_alert(
            &order.id.to_string(),
            order.product_type.as_str(),
            &order.email,
            &error.to_string(),
        )
        .await
    {
        tracing::error!(order_id = %order.id, error = %mail_err, "Failed to send alert email");
    }
}

/// Why an order is not printable, if it isn't.
#[must_use]
pub fn skip_reason(order: &Order) -> Option<&'static str> {
    if !order.product_type.requires_shipping() {
        return Some("digital product");
    }
    if order.shipping_address.is_none() {
        return Some("no shipping address collected");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use advice_for_life_core::{OrderId, OrderStatus, ProductType};
    use chrono::Utc;

    fn order(product_type: ProductType, with_address: bool) -> Order {
        Order {
            id: OrderId::generate(),
            email: "buyer@example.com".to_owned(),
            customer_name: "Buyer".to_owned(),
            amount: 4199,
            status: OrderStatus::Completed,
            stripe_session_id: "cs_1".to_owned(),
            stripe_payment_intent_id: "pi_1".to_owned(),
            product_type,
            shipping_address: with_address.then(|| crate::models::ShippingAddress {
                name: "Buyer".to_owned(),
                line1: "1 Main St".to_owned(),
                line2: None,
                city: "Phoenix".to_owned(),
                state: "AZ".to_owned(),
                postal_code: "85001".to_owned(),
                country: "US".to_owned(),
            }),
            phone: None,
            acquisition_source: None,
            company_name: None,
            lulu_print_job_id: None,
            lulu_print_job_status: None,
            lulu_tracking_id: None,
            lulu_tracking_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_skip_reasons() {
        assert_eq!(
            skip_reason(&order(ProductType::Pdf, false)),
            Some("digital product")
        );
        assert_eq!(
            skip_reason(&order(ProductType::Hardback, false)),
            Some("no shipping address collected")
        );
        assert_eq!(skip_reason(&order(ProductType::Hardback, true)), None);
        // The bundle includes a hardback and must print
        assert_eq!(skip_reason(&order(ProductType::Bundle, true)), None);
    }
}

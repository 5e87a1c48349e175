//! Order repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use advice_for_life_core::OrderId;

use super::RepositoryError;
use crate::models::{NewOrder, Order, ShippingAddress};

const ORDER_COLUMNS: &str = "id, email, customer_name, amount, status, stripe_session_id, \
     stripe_payment_intent_id, product_type, shipping_address, phone, acquisition_source, \
     company_name, lulu_print_job_id, lulu_print_job_status, lulu_tracking_id, \
     lulu_tracking_url, created_at, updated_at";

/// Raw database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    email: String,
    customer_name: String,
    amount: i64,
    status: String,
    stripe_session_id: String,
    stripe_payment_intent_id: String,
    product_type: String,
    shipping_address: Option<Json<ShippingAddress>>,
    phone: Option<String>,
    acquisition_source: Option<String>,
    company_name: Option<String>,
    lulu_print_job_id: Option<i64>,
    lulu_print_job_status: Option<String>,
    lulu_tracking_id: Option<String>,
    lulu_tracking_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let product_type = row.product_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            email: row.email,
            customer_name: row.customer_name,
            amount: row.amount,
            status,
            stripe_session_id: row.stripe_session_id,
            stripe_payment_intent_id: row.stripe_payment_intent_id,
            product_type,
            shipping_address: row.shipping_address.map(|Json(address)| address),
            phone: row.phone,
            acquisition_source: row.acquisition_source,
            company_name: row.company_name,
            lulu_print_job_id: row.lulu_print_job_id,
            lulu_print_job_status: row.lulu_print_job_status,
            lulu_tracking_id: row.lulu_tracking_id,
            lulu_tracking_url: row.lulu_tracking_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order if no order exists for its checkout session yet.
    ///
    /// Returns the order and whether this call created it. The webhook and
    /// the success-page fallback both funnel through this, so webhook
    /// retries and races are harmless.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, and
    /// `DataCorruption` if an existing row cannot be decoded.
    pub async fn create_if_absent(
        &self,
        order: &NewOrder,
    ) -> Result<(Order, bool), RepositoryError> {
        let query = format!(
            "INSERT INTO orders (email, customer_name, amount, stripe_session_id, \
             stripe_payment_intent_id, product_type, shipping_address, phone, \
             acquisition_source, company_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (stripe_session_id) DO NOTHING \
             RETURNING {ORDER_COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, OrderRow>(&query)
            .bind(&order.email)
            .bind(&order.customer_name)
            .bind(order.amount)
            .bind(&order.stripe_session_id)
            .bind(&order.stripe_payment_intent_id)
            .bind(order.product_type.as_str())
            .bind(order.shipping_address.clone().map(Json))
            .bind(&order.phone)
            .bind(&order.acquisition_source)
            .bind(&order.company_name)
            .fetch_optional(self.pool)
            .await?;

        if let Some(row) = inserted {
            return Ok((row.try_into()?, true));
        }

        // Conflict: another request already materialized this session.
        let existing = self
            .get_by_stripe_session(&order.stripe_session_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok((existing, false))
    }

    /// Get an order by its Stripe checkout session id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_stripe_session(
        &self,
        session_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE stripe_session_id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(session_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Record the print job created for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn record_print_job(
        &self,
        id: OrderId,
        print_job_id: i64,
        status: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders \
             SET lulu_print_job_id = $2, lulu_print_job_status = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(print_job_id)
        .bind(status)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record the latest print job status and tracking info for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn record_print_job_status(
        &self,
        id: OrderId,
        status: &str,
        tracking_id: Option<&str>,
        tracking_url: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders \
             SET lulu_print_job_status = $2, \
                 lulu_tracking_id = COALESCE($3, lulu_tracking_id), \
                 lulu_tracking_url = COALESCE($4, lulu_tracking_url), \
                 updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(tracking_id)
        .bind(tracking_url)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

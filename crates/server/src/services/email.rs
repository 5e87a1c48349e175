//! Email service for operational alerts.
//!
//! Uses SMTP via lettre. Alerts are plain text; there is no customer-facing
//! mail here (order confirmations come from Stripe).

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for operational alerts.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    alert_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            alert_address: config.alert_address.clone(),
        })
    }

    /// Alert the site owner that a paid physical order did not reach the
    /// print vendor and needs manual handling.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or sent.
    pub async fn send_print_job_failure_alert(
        &self,
        order_id: &str,
        product_type: &str,
        customer_email: &str,
        error_text: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Print job submission failed and needs manual follow-up.\n\n\
             Order: {order_id}\n\
             Product: {product_type}\n\
             Customer: {customer_email}\n\n\
             Error:\n{error_text}\n"
        );

        self.send_alert(&format!("Print job failed for order {order_id}"), &body)
            .await
    }

    async fn send_alert(&self, subject: &str, body: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .alert_address
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.alert_address.clone()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;

        self.mailer.send(email).await?;
        Ok(())
    }
}

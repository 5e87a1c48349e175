//! Business logic services.
//!
//! Handlers stay thin; anything shared between endpoints (order
//! materialization, print-job submission, password handling, alert email)
//! lives here.

pub mod auth;
pub mod email;
pub mod fulfillment;
pub mod orders;

pub use auth::AdminAuthService;
pub use email::EmailService;

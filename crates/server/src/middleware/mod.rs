//! Middleware: admin auth extractors, sessions, and rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::RequireAdminAuth;
pub use rate_limit::{form_rate_limiter, login_rate_limiter};
pub use session::create_session_layer;

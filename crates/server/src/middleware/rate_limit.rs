//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Two limiters cover the abuse surface:
//! - `login_rate_limiter`: strict limits on admin login (~10/min per IP)
//! - `form_rate_limiter`: public form posts - subscribe, contact, idea
//!   submission (~30/min per IP)
//!
//! Keys come from `SmartIpKeyExtractor`, which understands the usual proxy
//! headers (`x-forwarded-for`, `x-real-ip`) before falling back to the peer
//! address.

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the admin login endpoint: ~10 requests per minute
/// per IP (1 token every 6 seconds, burst of 5). Slows down credential
/// stuffing.
///
/// # Panics
///
/// This function will not panic: the configuration uses only valid positive
/// integers, which `GovernorConfigBuilder` always accepts.
#[must_use]
pub fn login_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for public form endpoints: ~30 requests per minute
/// per IP (1 token every 2 seconds, burst of 10).
///
/// # Panics
///
/// This function will not panic: the configuration uses only valid positive
/// integers, which `GovernorConfigBuilder` always accepts.
#[must_use]
pub fn form_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(2)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(2) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}

//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Store
//! POST /api/checkout               - Create a Stripe checkout session
//! POST /api/webhook                - Stripe webhook (signed)
//! GET  /api/download               - Redeem a download token
//! GET  /api/order-details          - Success-page order summary
//!
//! # Forms (rate limited)
//! POST /api/subscribe              - Newsletter signup
//! POST /api/contact                - Contact form
//! POST /api/business-ideas         - Business idea submission
//!
//! # Business tracker
//! GET  /api/businesses             - Public list + counts
//! POST /api/businesses             - Create (admin)
//! PATCH  /api/businesses/{id}      - Update (admin)
//! DELETE /api/businesses/{id}      - Delete (admin)
//!
//! # Business ideas (admin review)
//! GET  /api/business-ideas         - List + status counts (admin)
//! GET  /api/business-ideas/count   - Public submission count
//! PATCH  /api/business-ideas/{id}  - Review (admin)
//! DELETE /api/business-ideas/{id}  - Delete (admin)
//!
//! # Admin
//! POST /auth/login                 - Session login (rate limited)
//! POST /auth/logout                - Session logout
//! GET  /api/admin/print/packages   - POD package listing
//! POST /api/admin/print/orders/{id}/refresh - Re-poll a print job
//! ```

pub mod admin;
pub mod auth;
pub mod business_ideas;
pub mod businesses;
pub mod checkout;
pub mod contact;
pub mod download;
pub mod orders;
pub mod subscribe;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{form_rate_limiter, login_rate_limiter};
use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout::create_session))
        .route("/webhook", post(webhook::stripe_webhook))
        .route("/download", get(download::redeem))
        .route("/order-details", get(orders::order_details))
        .route(
            "/subscribe",
            post(subscribe::subscribe).layer(form_rate_limiter()),
        )
        .route("/contact", post(contact::submit).layer(form_rate_limiter()))
        .route(
            "/businesses",
            get(businesses::list).post(businesses::create),
        )
        .route(
            "/businesses/{id}",
            axum::routing::patch(businesses::update).delete(businesses::remove),
        )
        .route(
            "/business-ideas",
            get(business_ideas::list)
                .post(business_ideas::submit)
                .layer(form_rate_limiter()),
        )
        .route("/business-ideas/count", get(business_ideas::count))
        .route(
            "/business-ideas/{id}",
            axum::routing::patch(business_ideas::review).delete(business_ideas::remove),
        )
        .nest("/admin", admin_routes())
}

/// Create the `/auth` router (admin session login).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login).layer(login_rate_limiter()))
        .route("/logout", post(auth::logout))
}

/// Create the `/api/admin` router (all handlers check the session).
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/print/packages", get(admin::pod_packages))
        .route(
            "/print/orders/{id}/refresh",
            post(admin::refresh_print_job),
        )
}

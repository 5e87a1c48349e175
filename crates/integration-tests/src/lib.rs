//! Shared helpers for API contract tests.
//!
//! The tests in `tests/` exercise a running server over HTTP and are
//! `#[ignore]`d by default. To run them:
//!
//! 1. Start `PostgreSQL` and run `afl-cli migrate`
//! 2. Start the server: `cargo run -p advice-for-life-server`
//! 3. `cargo test -p advice-for-life-integration-tests -- --ignored`
//!
//! `AFL_TEST_BASE_URL` overrides the default server address.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("AFL_TEST_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// HTTP client with a cookie store (needed for admin session tests).
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

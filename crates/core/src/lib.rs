//! Advice for Life Core - Shared types library.
//!
//! This crate provides common types used across all Advice for Life
//! components:
//! - `server` - Web binary serving the public JSON API and admin endpoints
//! - `cli` - Command-line tools for migrations, admin users, and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, the product
//!   catalog enum, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Core types for Advice for Life.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use product::{DownloadKind, ProductType};
pub use status::*;

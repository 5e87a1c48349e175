//! Advice for Life server library.
//!
//! This crate provides the site backend as a library, allowing it to be
//! tested and reused; the binary in `main.rs` wires it to a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod lulu;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;

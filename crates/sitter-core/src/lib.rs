//! Core types and trait definitions for the Sitter childcare marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod criteria;
pub mod error;
pub mod favorite;
pub mod geo;
pub mod mail;
pub mod plan;
pub mod planning;
pub mod rating;
pub mod reference;
pub mod store;
pub mod visibility;

pub use error::{Error, Result};

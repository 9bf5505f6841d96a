//! Core types and trait definitions for the Starling review engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It owns the revision-resolution, feed, trend, and enrichment logic;
//! storage backends and classifier clients plug in through the
//! [`store::ReviewStore`] and [`enrich::Classifier`] traits.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod enrich;
pub mod error;
pub mod feed;
pub mod resolve;
pub mod review;
pub mod store;
pub mod trends;

pub use error::{Error, Result};

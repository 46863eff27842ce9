//! Domain model for scored survey responses.
//!
//! # Responsibility
//! - Define the response record owned by the store.
//! - Define threshold-derived sentiment buckets.
//!
//! # Invariants
//! - Every response is identified by a stable `ResponseId`.
//! - Sentiment is derived from score and never stored on its own.

pub mod response;
pub mod sentiment;

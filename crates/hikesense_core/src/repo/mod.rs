//! Repository layer: durable storage of responses.
//!
//! # Responsibility
//! - Define the storage contract consumed by the response store.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Storage writes enforce `Response::validate()` before persistence.
//! - Storage APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod response_repo;

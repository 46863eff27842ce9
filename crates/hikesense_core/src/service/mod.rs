//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate scoring and storage calls into the store operations the UI
//!   collaborator consumes.
//! - Keep callers decoupled from storage and engine details.

pub mod response_store;

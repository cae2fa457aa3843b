//! # Retention Feature
//!
//! Short-lived memory of deleted and edited messages, replayed with `👀`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod cache;

pub use cache::{CachedMessage, RetentionCache, DEFAULT_RETENTION_SECONDS};

//! # Core Module
//!
//! Configuration, logging, connection lifecycle and message helpers shared by
//! every feature.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add lifecycle signal for background tasks
//! - 1.1.0: Add response module with message size helpers
//! - 1.0.0: Initial creation with config and logging

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod response;

// Re-export commonly used items
pub use config::{AreaConfig, Config, ReminderConfig};
pub use lifecycle::{ConnectionState, Lifecycle};
pub use response::{tail_chars, truncate_for_message, LOG_TAIL_CHARS, MESSAGE_LIMIT};

// Core layer - configuration, logging, lifecycle
pub mod core;

// Features layer - retention cache, reminders, phrases, places
pub mod features;

// Application layer
pub mod message_handler;

// Re-export core config for convenience
pub use crate::core::Config;

pub use features::{
    // Phrases
    PhraseMatcher, Trigger,
    // Places
    Places, Suggestion,
    // Reminders
    reminder_loop, Reminder, ReminderSink, Scheduler, WeeklyRecurrence,
    // Retention
    CachedMessage, RetentionCache,
};

pub use message_handler::MessageHandler;

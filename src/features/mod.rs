//! # Features
//!
//! - `retention`: replay of recently deleted and edited messages
//! - `reminders`: weekly reminder with delivery guard
//! - `phrases`: regex-triggered replies
//! - `places`: food suggestions

pub mod phrases;
pub mod places;
pub mod reminders;
pub mod retention;

pub use phrases::{PhraseMatcher, Trigger};
pub use places::{PlaceError, Places, Suggestion};
pub use reminders::{reminder_loop, Reminder, ReminderSink, Scheduler, WeeklyRecurrence};
pub use retention::{CachedMessage, RetentionCache};

//! # Reminders Feature
//!
//! Weekly reminder posted to a configured channel, at most once per hour.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Split schedule, delivery guard and Discord sink
//! - 1.0.0: Initial weekly reminder

pub mod poller;
pub mod reminder;
pub mod schedule;
pub mod sink;

pub use poller::{reminder_loop, DEFAULT_POLL_INTERVAL};
pub use reminder::{FireOutcome, Reminder, ReminderSink};
pub use schedule::{JobState, ScheduledJob, Scheduler, WeeklyRecurrence};
pub use sink::{ChannelSink, ReminderTarget};

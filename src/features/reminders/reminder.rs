//! # Weekly Reminder
//!
//! The reminder job and its delivery guard. The schedule can report a job due
//! more than once around its trigger instant (coarse polling, restarts), so
//! every firing goes through `try_fire`, which accepts at most one delivery per
//! `min_interval`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Guard keyed on the caller's clock so it can be driven in tests
//! - 1.0.0: Reminder plus random place suggestion

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use tokio::sync::Mutex;

use crate::features::places::Places;

/// Minimum time between two delivered reminders
pub const DEFAULT_MIN_INTERVAL_MINUTES: i64 = 60;

/// Where reminder messages are posted
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    /// Fired too recently; nothing was sent
    Suppressed,
}

struct ReminderState {
    last_fired_at: DateTime<Utc>,
}

pub struct Reminder {
    name: String,
    message: String,
    places: Places,
    min_interval: Duration,
    state: Mutex<ReminderState>,
}

impl Reminder {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        places: Places,
        min_interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            places,
            min_interval,
            state: Mutex::new(ReminderState {
                last_fired_at: DateTime::<Utc>::default(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn last_fired_at(&self) -> DateTime<Utc> {
        self.state.lock().await.last_fired_at
    }

    /// Post the reminder unless one went out less than `min_interval` ago.
    ///
    /// The lock is held across the sends, so concurrent callers queue behind
    /// an in-flight delivery and then see its timestamp. The guard advances
    /// once the main message is sent; a failed suggestion is only logged.
    pub async fn try_fire(
        &self,
        now: DateTime<Utc>,
        sink: &dyn ReminderSink,
    ) -> Result<FireOutcome> {
        let mut state = self.state.lock().await;

        if now - state.last_fired_at < self.min_interval {
            info!(
                "Reminder '{}' suppressed, last posted at {}",
                self.name, state.last_fired_at
            );
            return Ok(FireOutcome::Suppressed);
        }

        info!("Posting reminder '{}'", self.name);
        sink.send(&self.message).await?;
        state.last_fired_at = now;

        let suggestion = {
            let mut rng = rand::rng();
            self.places.choose(&mut rng)
        };
        if let Some(suggestion) = suggestion {
            if let Err(e) = sink.send(&suggestion.reminder_line()).await {
                warn!("Failed to send suggestion for '{}': {e}", self.name);
            }
        }

        Ok(FireOutcome::Fired)
    }
}

/// Sink that keeps every message, for tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub sent: std::sync::Mutex<Vec<String>>,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ReminderSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("channel unavailable"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap()
    }

    fn reminder() -> Reminder {
        Reminder::new(
            "primantis",
            "It's Primanti's Monday.",
            Places::default(),
            Duration::minutes(DEFAULT_MIN_INTERVAL_MINUTES),
        )
    }

    #[tokio::test]
    async fn test_first_fire_sends_reminder_and_suggestion() {
        let reminder = reminder();
        let sink = RecordingSink::default();

        let outcome = reminder.try_fire(t0(), &sink).await.unwrap();

        assert_eq!(outcome, FireOutcome::Fired);
        let sent = sink.messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], "It's Primanti's Monday.");
        assert!(sent[1].starts_with("You could go to "));
        assert!(sent[1].ends_with('.'));
        assert_eq!(reminder.last_fired_at().await, t0());
    }

    #[tokio::test]
    async fn test_guard_suppresses_within_interval() {
        let reminder = reminder();
        let sink = RecordingSink::default();

        assert_eq!(
            reminder.try_fire(t0(), &sink).await.unwrap(),
            FireOutcome::Fired
        );
        assert_eq!(
            reminder
                .try_fire(t0() + Duration::seconds(1800), &sink)
                .await
                .unwrap(),
            FireOutcome::Suppressed
        );
        assert_eq!(
            reminder
                .try_fire(t0() + Duration::seconds(3700), &sink)
                .await
                .unwrap(),
            FireOutcome::Fired
        );
        assert_eq!(sink.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_suppressed_call_keeps_timestamp() {
        let reminder = reminder();
        let sink = RecordingSink::default();

        reminder.try_fire(t0(), &sink).await.unwrap();
        reminder
            .try_fire(t0() + Duration::minutes(59), &sink)
            .await
            .unwrap();

        assert_eq!(reminder.last_fired_at().await, t0());
    }

    #[tokio::test]
    async fn test_exactly_one_interval_apart_fires() {
        let reminder = reminder();
        let sink = RecordingSink::default();

        reminder.try_fire(t0(), &sink).await.unwrap();
        let outcome = reminder
            .try_fire(t0() + Duration::hours(1), &sink)
            .await
            .unwrap();
        assert_eq!(outcome, FireOutcome::Fired);
    }

    #[tokio::test]
    async fn test_concurrent_triggers_fire_once() {
        let reminder = Arc::new(reminder());
        let sink = Arc::new(RecordingSink::default());

        let mut handles = Vec::new();
        for i in 0..8 {
            let reminder = reminder.clone();
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                reminder
                    .try_fire(t0() + Duration::seconds(i), sink.as_ref())
                    .await
                    .unwrap()
            }));
        }

        let mut fired = 0;
        for handle in handles {
            if handle.await.unwrap() == FireOutcome::Fired {
                fired += 1;
            }
        }

        assert_eq!(fired, 1);
        assert_eq!(sink.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_does_not_advance_guard() {
        let reminder = reminder();
        let failing = RecordingSink {
            fail: true,
            ..Default::default()
        };

        assert!(reminder.try_fire(t0(), &failing).await.is_err());
        assert_eq!(reminder.last_fired_at().await, DateTime::<Utc>::default());

        let sink = RecordingSink::default();
        assert_eq!(
            reminder
                .try_fire(t0() + Duration::seconds(30), &sink)
                .await
                .unwrap(),
            FireOutcome::Fired
        );
    }

    #[tokio::test]
    async fn test_empty_place_table_sends_only_reminder() {
        let reminder = Reminder::new("r", "hello", Places::new(vec![]), Duration::hours(1));
        let sink = RecordingSink::default();

        reminder.try_fire(t0(), &sink).await.unwrap();
        assert_eq!(sink.messages(), vec!["hello".to_string()]);
    }
}

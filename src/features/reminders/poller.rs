//! Reminder polling loop
//!
//! Waits for the gateway to be ready, then checks the schedule on a fixed
//! interval until the connection closes. Due reminders are spawned so a slow
//! send never delays the next check.

use chrono::{Local, Utc};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

use super::reminder::{FireOutcome, Reminder, ReminderSink};
use super::schedule::Scheduler;
use crate::core::Lifecycle;

/// Default time between schedule checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub async fn reminder_loop(
    lifecycle: Lifecycle,
    mut scheduler: Scheduler<Arc<Reminder>>,
    sink: Arc<dyn ReminderSink>,
    poll_interval: Duration,
) {
    if !lifecycle.wait_until_ready().await {
        info!("Connection closed before ready, reminder loop not started");
        return;
    }

    info!(
        "Reminder loop started ({} jobs, polling every {}s)",
        scheduler.jobs().len(),
        poll_interval.as_secs()
    );

    while !lifecycle.is_closed() {
        for reminder in scheduler.run_pending(Local::now().naive_local()) {
            let sink = sink.clone();
            tokio::spawn(async move {
                match reminder.try_fire(Utc::now(), sink.as_ref()).await {
                    Ok(FireOutcome::Fired) => info!("Reminder '{}' posted", reminder.name()),
                    Ok(FireOutcome::Suppressed) => {}
                    Err(e) => error!("Failed to post reminder '{}': {e}", reminder.name()),
                }
            });
        }

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = lifecycle.closed() => break,
        }
    }

    info!("Reminder loop stopped");
}

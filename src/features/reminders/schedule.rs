//! Weekly job schedule
//!
//! Jobs recur on a fixed weekday and wall-clock time. `run_pending` is polled
//! from a timer loop; a job is reported once per crossing of its trigger
//! instant and then rescheduled for the following week.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use log::debug;

/// "Every <weekday> at <time>"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRecurrence {
    pub weekday: Weekday,
    pub at: NaiveTime,
}

impl WeeklyRecurrence {
    pub fn new(weekday: Weekday, at: NaiveTime) -> Self {
        Self { weekday, at }
    }

    /// First matching instant strictly after `now`
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let days_ahead = (7 + self.weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            % 7;
        let candidate = (today + Duration::days(days_ahead)).and_time(self.at);

        if candidate > now {
            candidate
        } else {
            candidate + Duration::days(7)
        }
    }
}

impl std::fmt::Display for WeeklyRecurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "every {} at {}", self.weekday, self.at.format("%H:%M"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Waiting for the next trigger instant
    Idle,
    /// Trigger instant crossed, not yet picked up by `run_pending`
    Due,
}

#[derive(Debug, Clone)]
pub struct ScheduledJob<J> {
    pub name: String,
    pub recurrence: WeeklyRecurrence,
    pub next_run: NaiveDateTime,
    pub last_run: Option<NaiveDateTime>,
    job: J,
}

impl<J> ScheduledJob<J> {
    pub fn state(&self, now: NaiveDateTime) -> JobState {
        if self.next_run <= now {
            JobState::Due
        } else {
            JobState::Idle
        }
    }
}

/// Set of weekly jobs carrying a payload `J` handed back when due
#[derive(Debug, Clone)]
pub struct Scheduler<J> {
    jobs: Vec<ScheduledJob<J>>,
}

impl<J: Clone> Scheduler<J> {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Register a job; its first run is the next occurrence after `now`
    pub fn every(
        &mut self,
        name: impl Into<String>,
        recurrence: WeeklyRecurrence,
        job: J,
        now: NaiveDateTime,
    ) -> NaiveDateTime {
        let next_run = recurrence.next_after(now);
        self.jobs.push(ScheduledJob {
            name: name.into(),
            recurrence,
            next_run,
            last_run: None,
            job,
        });
        next_run
    }

    pub fn jobs(&self) -> &[ScheduledJob<J>] {
        &self.jobs
    }

    pub fn next_run(&self, name: &str) -> Option<NaiveDateTime> {
        self.jobs.iter().find(|j| j.name == name).map(|j| j.next_run)
    }

    /// Collect every due job and reschedule it past `now`
    pub fn run_pending(&mut self, now: NaiveDateTime) -> Vec<J> {
        let mut due = Vec::new();

        for job in self.jobs.iter_mut() {
            if job.state(now) == JobState::Due {
                job.last_run = Some(now);
                job.next_run = job.recurrence.next_after(now);
                debug!("Job '{}' due, next run {}", job.name, job.next_run);
                due.push(job.job.clone());
            }
        }

        due
    }
}

impl<J: Clone> Default for Scheduler<J> {
    fn default() -> Self {
        Self::new()
    }
}

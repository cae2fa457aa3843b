//! # Phrases Feature
//!
//! Regex triggers on ordinary chat messages. Every trigger is checked on its
//! own, so one message can produce several replies.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use anyhow::Result;
use regex::Regex;

/// Message content that replays the retention cache
pub const EYES: &str = "👀";

pub const HOW_MAKE_REPLY: &str = "You wouldn't understand.";
pub const ANY_IDEAS_REPLY: &str = "I have a million ideas. They all point to certain death.";

/// What a message asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Replay recently deleted/edited messages in this channel
    Eyes,
    /// Fixed reply
    Reply(&'static str),
    /// Food suggestion, optionally restricted to an area
    Food { area: Option<String> },
    /// Admin-only: tail of the log file
    LogTail,
}

pub struct PhraseMatcher {
    how_make: Regex,
    any_ideas: Regex,
    where_food: Regex,
    log_command: Regex,
}

impl PhraseMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            how_make: Regex::new(r"^how make")?,
            any_ideas: Regex::new(r"any\s+ideas")?,
            where_food: Regex::new(r"^where get food(?: in (.*))?")?,
            log_command: Regex::new(r"^marvin\s+log$")?,
        })
    }

    /// Triggers for `content`, in reply order
    pub fn matches(&self, content: &str, from_admin: bool) -> Vec<Trigger> {
        let mut triggers = Vec::new();
        let lower = content.to_lowercase();

        if content.trim() == EYES {
            triggers.push(Trigger::Eyes);
        }

        if self.how_make.is_match(&lower) {
            triggers.push(Trigger::Reply(HOW_MAKE_REPLY));
        }

        if self.any_ideas.is_match(&lower) {
            triggers.push(Trigger::Reply(ANY_IDEAS_REPLY));
        }

        if let Some(caps) = self.where_food.captures(&lower) {
            // An empty area after " in " is kept and rejected as unknown
            let area = caps.get(1).map(|m| m.as_str().trim().to_string());
            triggers.push(Trigger::Food { area });
        }

        if from_admin && self.log_command.is_match(&lower) {
            triggers.push(Trigger::LogTail);
        }

        triggers
    }
}

//! # Message Handler
//!
//! Turns gateway message events into cache updates and replies. Serenity runs
//! every event on its own task, so the retention cache sits behind a lock that
//! is released before any reply is sent.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Keep sub-second creation times, only skip Marvin's own messages
//! - 1.1.0: Owned retention cache instead of a shared global
//! - 1.0.0: Phrase replies, 👀 replay, log tail

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use rand::Rng;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::prelude::Context;
use tokio::sync::Mutex;

use crate::core::{logging, tail_chars, truncate_for_message, LOG_TAIL_CHARS};
use crate::features::phrases::{PhraseMatcher, Trigger};
use crate::features::places::Places;
use crate::features::retention::{CachedMessage, RetentionCache};

pub struct MessageHandler {
    retention: Mutex<RetentionCache>,
    phrases: PhraseMatcher,
    places: Places,
    admin_id: u64,
    log_file: String,
}

/// Snapshot a serenity message for the retention cache
pub fn snapshot(msg: &Message) -> CachedMessage {
    let created_at =
        DateTime::from_timestamp(msg.timestamp.unix_timestamp(), msg.timestamp.nanosecond())
            .unwrap_or_else(Utc::now);
    let display_name = msg
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| msg.author.name.clone());

    CachedMessage::new(msg.channel_id.0, display_name, msg.content.clone(), created_at)
}

/// Marvin's own posts (replays included) never trigger replies. Other bots do.
pub fn is_own_message(msg: &Message, current_user_id: UserId) -> bool {
    msg.author.id == current_user_id
}

impl MessageHandler {
    pub fn new(
        retention: RetentionCache,
        phrases: PhraseMatcher,
        places: Places,
        admin_id: u64,
        log_file: impl Into<String>,
    ) -> Self {
        Self {
            retention: Mutex::new(retention),
            phrases,
            places,
            admin_id,
            log_file: log_file.into(),
        }
    }

    /// Cache a deleted message
    pub async fn record_deleted(&self, message: CachedMessage, now: DateTime<Utc>) {
        info!(
            "Got deleted message from {} in channel {}",
            message.author_display_name, message.channel_id
        );
        let mut retention = self.retention.lock().await;
        retention.record(message);
        retention.evict_expired(now);
    }

    /// Cache the pre-edit content if the edit changed it
    pub async fn record_edited(
        &self,
        before: CachedMessage,
        after_content: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let channel_id = before.channel_id;
        let mut retention = self.retention.lock().await;
        let recorded = retention.record_edit(before, after_content);
        if recorded {
            info!("Content changed in channel {channel_id}, cached previous version");
            retention.evict_expired(now);
        }
        recorded
    }

    /// Replies for a new message, in send order
    pub async fn replies(
        &self,
        channel_id: u64,
        author_id: u64,
        content: &str,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let mut replies = Vec::new();

        for trigger in self.phrases.matches(content, author_id == self.admin_id) {
            match trigger {
                Trigger::Eyes => {
                    info!("Matched :eyes: in channel {channel_id}");
                    let cached = self.retention.lock().await.lookup(channel_id, now);
                    replies.extend(cached.iter().map(CachedMessage::said_line));
                }
                Trigger::Reply(text) => replies.push(text.to_string()),
                Trigger::Food { area } => {
                    let mut rng = rand::rng();
                    replies.push(self.food_reply(area.as_deref(), &mut rng));
                }
                Trigger::LogTail => {
                    info!("Matched 'marvin log'");
                    match self.log_tail() {
                        Ok(tail) => replies.push(tail),
                        Err(e) => error!("Failed to read log for admin: {e}"),
                    }
                }
            }
        }

        replies
    }

    fn food_reply<R: Rng + ?Sized>(&self, area: Option<&str>, rng: &mut R) -> String {
        let choice = match area {
            Some(area) => self.places.choose_in(area, rng).map_err(|e| e.to_string()),
            None => self
                .places
                .choose(rng)
                .ok_or_else(|| "I don't know anywhere to eat.".to_string()),
        };

        match choice {
            Ok(suggestion) => suggestion.reply(),
            Err(reason) => reason,
        }
    }

    fn log_tail(&self) -> Result<String> {
        let text = logging::read_log(&self.log_file)?;
        Ok(tail_chars(&text, LOG_TAIL_CHARS).to_string())
    }

    /// Reply to a new message. Send failures are logged and dropped.
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) {
        debug!(
            "Got message {} from {} with contents {:?}",
            msg.id, msg.author.name, msg.content
        );

        let replies = self
            .replies(msg.channel_id.0, msg.author.id.0, &msg.content, Utc::now())
            .await;

        for reply in replies {
            if let Err(why) = msg
                .channel_id
                .say(&ctx.http, truncate_for_message(&reply))
                .await
            {
                error!("Failed to send reply in {}: {why}", msg.channel_id);
            }
        }
    }

    /// Recover a deleted message from serenity's message cache
    pub async fn handle_delete(
        &self,
        ctx: &Context,
        channel_id: ChannelId,
        message_id: MessageId,
    ) {
        match ctx.cache.message(channel_id, message_id) {
            Some(message) => self.record_deleted(snapshot(&message), Utc::now()).await,
            None => debug!("Deleted message {message_id} in {channel_id} was not cached"),
        }
    }

    pub async fn handle_update(
        &self,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: &MessageUpdateEvent,
    ) {
        let Some(before) = old_if_available else {
            debug!("Edited message {} was not cached", event.id);
            return;
        };

        let after_content = match new {
            Some(message) => message.content,
            None => match &event.content {
                Some(content) => content.clone(),
                // No content in the update: embed-only change
                None => {
                    debug!("Message {} not changed", event.id);
                    return;
                }
            },
        };

        self.record_edited(snapshot(&before), &after_content, Utc::now())
            .await;
    }
}

//! # Retention Cache
//!
//! Recently deleted messages and the previous content of edited messages,
//! kept for a fixed window so `👀` can replay them in the same channel.
//!
//! Entries expire by the message's original creation time, not by when it was
//! deleted: a message posted four minutes ago and deleted now is only
//! replayable for one more minute.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{DateTime, Duration, Utc};
use log::debug;

/// Default retention window (5 minutes)
pub const DEFAULT_RETENTION_SECONDS: i64 = 5 * 60;

/// Snapshot of a message taken when it was deleted or edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedMessage {
    pub channel_id: u64,
    /// Guild nickname if set, else account name
    pub author_display_name: String,
    /// For edits, the content before the edit
    pub content: String,
    /// Original creation time of the message
    pub created_at: DateTime<Utc>,
}

impl CachedMessage {
    pub fn new(
        channel_id: u64,
        author_display_name: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id,
            author_display_name: author_display_name.into(),
            content: content.into(),
            created_at,
        }
    }

    /// Replay line posted for this entry
    pub fn said_line(&self) -> String {
        format!("{} said: {}", self.author_display_name, self.content)
    }
}

/// Insertion-ordered buffer with time-based eviction.
///
/// Not synchronized; the owner wraps it in a lock when events are handled in
/// parallel.
#[derive(Debug)]
pub struct RetentionCache {
    entries: Vec<CachedMessage>,
    window: Duration,
}

impl RetentionCache {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a snapshot of a deleted message
    pub fn record(&mut self, message: CachedMessage) {
        debug!(
            "Caching message from {} in channel {}",
            message.author_display_name, message.channel_id
        );
        self.entries.push(message);
    }

    /// Store the pre-edit snapshot, but only if the content actually changed.
    ///
    /// Returns whether an entry was recorded. Edits that only touch embeds
    /// leave the content unchanged and are ignored.
    pub fn record_edit(&mut self, before: CachedMessage, after_content: &str) -> bool {
        if before.content == after_content {
            debug!("Message in channel {} not changed", before.channel_id);
            return false;
        }

        self.record(before);
        true
    }

    /// Drop every entry created more than the retention window before `now`.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window;
        let before = self.entries.len();
        self.entries.retain(|entry| entry.created_at >= cutoff);

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Evicted {removed} expired cached messages");
        }
        removed
    }

    /// Evict, then return this channel's entries in the order they were recorded
    pub fn lookup(&mut self, channel_id: u64, now: DateTime<Utc>) -> Vec<CachedMessage> {
        self.evict_expired(now);
        self.entries
            .iter()
            .filter(|entry| entry.channel_id == channel_id)
            .cloned()
            .collect()
    }
}

impl Default for RetentionCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_RETENTION_SECONDS))
    }
}

//! Discord delivery for reminders
//!
//! The target channel is resolved on every send so a channel configured by
//! name is found even if the guild cache filled in after startup.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::Channel;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;

use super::reminder::ReminderSink;
use crate::core::ReminderConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderTarget {
    Id(ChannelId),
    /// First channel with this name, skipping the debug guild
    Name {
        name: String,
        skip_guild: Option<GuildId>,
    },
}

impl ReminderTarget {
    /// `None` when the config names no channel
    pub fn from_config(config: &ReminderConfig) -> Option<Self> {
        if let Some(id) = config.channel_id {
            return Some(ReminderTarget::Id(ChannelId(id)));
        }

        config.channel_name.as_ref().map(|name| ReminderTarget::Name {
            name: name.clone(),
            skip_guild: config.debug_guild_id.map(GuildId),
        })
    }
}

pub struct ChannelSink {
    cache: Arc<Cache>,
    http: Arc<Http>,
    target: ReminderTarget,
}

impl ChannelSink {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>, target: ReminderTarget) -> Self {
        Self {
            cache,
            http,
            target,
        }
    }

    fn resolve(&self) -> Option<ChannelId> {
        match &self.target {
            ReminderTarget::Id(id) => Some(*id),
            ReminderTarget::Name { name, skip_guild } => {
                for guild_id in self.cache.guilds() {
                    if Some(guild_id) == *skip_guild {
                        continue;
                    }

                    let Some(guild) = self.cache.guild(guild_id) else {
                        continue;
                    };

                    for (channel_id, channel) in guild.channels.iter() {
                        if let Channel::Guild(gc) = channel {
                            if gc.name == *name {
                                debug!("Resolved reminder channel #{name} to {channel_id}");
                                return Some(*channel_id);
                            }
                        }
                    }
                }
                None
            }
        }
    }
}

#[async_trait]
impl ReminderSink for ChannelSink {
    async fn send(&self, text: &str) -> Result<()> {
        let channel_id = self
            .resolve()
            .ok_or_else(|| anyhow::anyhow!("Reminder channel {:?} not found", self.target))?;

        channel_id.say(&self.http, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_prefers_channel_id() {
        let config = ReminderConfig {
            channel_id: Some(10),
            channel_name: Some("execs".to_string()),
            ..Default::default()
        };

        assert_eq!(
            ReminderTarget::from_config(&config),
            Some(ReminderTarget::Id(ChannelId(10)))
        );
    }

    #[test]
    fn test_target_by_name_skips_debug_guild() {
        let config = ReminderConfig {
            channel_name: Some("execs".to_string()),
            debug_guild_id: Some(5),
            ..Default::default()
        };

        assert_eq!(
            ReminderTarget::from_config(&config),
            Some(ReminderTarget::Name {
                name: "execs".to_string(),
                skip_guild: Some(GuildId(5)),
            })
        );
    }

    #[test]
    fn test_no_target_configured() {
        assert!(ReminderTarget::from_config(&ReminderConfig::default()).is_none());
    }
}

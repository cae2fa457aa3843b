//! # Configuration
//!
//! YAML configuration loaded once at startup. Anything missing or malformed here
//! is fatal: the bot refuses to connect.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Reminder section and optional place table
//! - 1.0.0: Token and admin id

use anyhow::Result;
use chrono::{NaiveTime, Weekday};
use serde::Deserialize;

/// Default config path when `MARVIN_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Time format accepted for `reminder.at`
const TRIGGER_TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub token: String,

    /// User id allowed to run admin commands
    pub admin: u64,

    /// Log file, also served by the `marvin log` command
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// env_logger filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long deleted/edited messages stay replayable
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,

    /// Messages kept by serenity's cache so deletions can be recovered
    #[serde(default = "default_message_cache_size")]
    pub message_cache_size: usize,

    #[serde(default)]
    pub reminder: ReminderConfig,

    /// Replaces the built-in place table when present
    #[serde(default)]
    pub places: Option<Vec<AreaConfig>>,
}

/// Weekly reminder settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_weekday")]
    pub weekday: Weekday,

    /// Server-local wall-clock time, `HH:MM`
    #[serde(default = "default_at")]
    pub at: String,

    /// Target channel by id. Takes precedence over `channel_name`.
    #[serde(default)]
    pub channel_id: Option<u64>,

    /// Target channel by name, searched across all cached guilds
    #[serde(default)]
    pub channel_name: Option<String>,

    /// Guild skipped when resolving `channel_name`
    #[serde(default)]
    pub debug_guild_id: Option<u64>,

    #[serde(default = "default_reminder_message")]
    pub message: String,

    #[serde(default = "default_min_interval_minutes")]
    pub min_interval_minutes: u64,

    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
}

/// One area of the place table
#[derive(Debug, Clone, Deserialize)]
pub struct AreaConfig {
    pub name: String,
    #[serde(default)]
    pub places: Vec<String>,
}

fn default_log_file() -> String {
    "marvin.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_retention_seconds() -> u64 {
    300
}

fn default_message_cache_size() -> usize {
    500
}

fn default_weekday() -> Weekday {
    Weekday::Mon
}

fn default_at() -> String {
    "17:00".to_string()
}

fn default_reminder_message() -> String {
    "It's Primanti's Monday.".to_string()
}

fn default_min_interval_minutes() -> u64 {
    60
}

fn default_poll_interval_seconds() -> u64 {
    30
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            weekday: default_weekday(),
            at: default_at(),
            channel_id: None,
            channel_name: None,
            debug_guild_id: None,
            message: default_reminder_message(),
            min_interval_minutes: default_min_interval_minutes(),
            poll_interval_seconds: default_poll_interval_seconds(),
        }
    }
}

impl Config {
    /// Load from the path in `MARVIN_CONFIG`, falling back to `config.yaml`
    pub fn from_env() -> Result<Self> {
        let path =
            std::env::var("MARVIN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path, e))?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(anyhow::anyhow!("Config field 'token' must not be empty"));
        }

        if self.admin == 0 {
            return Err(anyhow::anyhow!("Config field 'admin' must be a user id"));
        }

        if self.retention_seconds == 0 {
            return Err(anyhow::anyhow!("'retention_seconds' must be positive"));
        }

        self.reminder.trigger_time()?;

        if self.reminder.min_interval_minutes == 0 {
            return Err(anyhow::anyhow!(
                "'reminder.min_interval_minutes' must be positive"
            ));
        }

        if self.reminder.poll_interval_seconds == 0 {
            return Err(anyhow::anyhow!(
                "'reminder.poll_interval_seconds' must be positive"
            ));
        }

        if let Some(areas) = &self.places {
            for area in areas {
                if area.name.trim().is_empty() {
                    return Err(anyhow::anyhow!("Place areas must have a name"));
                }
            }
        }

        Ok(())
    }

    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.retention_seconds as i64)
    }
}

impl ReminderConfig {
    /// Parse `at` into a wall-clock time
    pub fn trigger_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.at.trim(), TRIGGER_TIME_FORMAT).map_err(|e| {
            anyhow::anyhow!(
                "Invalid reminder time '{}' (expected HH:MM): {}",
                self.at,
                e
            )
        })
    }

    /// The reminder only runs when it has somewhere to post
    pub fn is_enabled(&self) -> bool {
        self.channel_id.is_some() || self.channel_name.is_some()
    }

    pub fn min_interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.min_interval_minutes as i64)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse("token: abc\nadmin: 42\n").unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.admin, 42);
        assert_eq!(config.log_file, "marvin.log");
        assert_eq!(config.retention_seconds, 300);
        assert_eq!(config.reminder.weekday, Weekday::Mon);
        assert_eq!(
            config.reminder.trigger_time().unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap()
        );
        assert_eq!(config.reminder.min_interval(), chrono::Duration::hours(1));
        assert_eq!(config.reminder.poll_interval().as_secs(), 30);
        assert!(!config.reminder.is_enabled());
        assert!(config.places.is_none());
    }

    #[test]
    fn test_full_reminder_section() {
        let yaml = r#"
token: abc
admin: 7
reminder:
  weekday: friday
  at: "09:30"
  channel_name: execs
  debug_guild_id: 99
places:
  - name: Oakland
    places: ["Chipotle"]
"#;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.reminder.weekday, Weekday::Fri);
        assert_eq!(
            config.reminder.trigger_time().unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(config.reminder.channel_name.as_deref(), Some("execs"));
        assert_eq!(config.reminder.debug_guild_id, Some(99));
        assert!(config.reminder.is_enabled());
        assert_eq!(config.places.unwrap()[0].places, vec!["Chipotle"]);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(Config::parse("admin: 42\n").is_err());
        assert!(Config::parse("token: \"  \"\nadmin: 42\n").is_err());
    }

    #[test]
    fn test_invalid_trigger_time_is_rejected() {
        let yaml = "token: abc\nadmin: 1\nreminder:\n  at: \"25:99\"\n";
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_zero_intervals_are_rejected() {
        assert!(Config::parse("token: abc\nadmin: 1\nretention_seconds: 0\n").is_err());
        let yaml = "token: abc\nadmin: 1\nreminder:\n  min_interval_minutes: 0\n";
        assert!(Config::parse(yaml).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load("/nonexistent/marvin/config.yaml").is_err());
    }
}

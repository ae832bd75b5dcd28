use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the match feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Fixture provider configuration
    pub provider: ProviderConfig,

    /// Tracked teams, in display priority order
    pub tracked: Vec<TrackedEntry>,

    /// Date window around "now"
    pub window: WindowConfig,

    /// Result cache configuration
    pub cache: CacheConfig,

    /// Notification configuration
    pub notifications: NotificationConfig,

    /// Scheduler configuration
    pub scheduler: SchedulerConfig,

    /// Offset of the user's local calendar from UTC, in minutes
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider site root, used for API calls and match links
    pub base_url: String,

    /// Time zone name passed to league overview requests
    pub time_zone: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// A tracked team, optionally scoped to one league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub team_id: String,
    pub league_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Days before now included in the feed
    pub start_offset_days: u32,

    /// Days after now included in the feed
    pub end_offset_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding persisted records
    pub data_dir: PathBuf,

    /// Namespace for both the cached feed and the ledger
    pub namespace: String,

    /// Minutes a computed feed stays fresh
    pub ttl_minutes: u32,

    /// Key of the cached feed record
    pub feed_key: String,

    /// Key of the notification ledger record
    pub ledger_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send notifications for today's matches
    pub enabled: bool,

    /// ntfy server root
    pub ntfy_base_url: String,

    /// ntfy topic; nothing is pushed without it
    pub ntfy_topic: Option<String>,

    /// ntfy bearer token; nothing is pushed without it
    pub ntfy_token: Option<String>,

    /// Tag attached to every push
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes between refresh passes in watch mode
    pub refresh_minutes: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                base_url: "https://www.fotmob.com".to_string(),
                time_zone: "America/New_York".to_string(),
                timeout_secs: 30,
            },
            tracked: Vec::new(),
            window: WindowConfig { start_offset_days: 7, end_offset_days: 30 },
            cache: CacheConfig {
                data_dir: PathBuf::from("./data"),
                namespace: "MatchListCache".to_string(),
                ttl_minutes: 60,
                feed_key: "matches".to_string(),
                ledger_key: "sentNotifications".to_string(),
            },
            notifications: NotificationConfig {
                enabled: true,
                ntfy_base_url: "https://ntfy.sh".to_string(),
                ntfy_topic: None,
                ntfy_token: None,
                tag: "soccer".to_string(),
            },
            scheduler: SchedulerConfig { refresh_minutes: 15 },
            utc_offset_minutes: chrono::Local::now().offset().local_minus_utc() / 60,
        }
    }
}

impl TrackedEntry {
    /// Build an entry, trimming both ids
    pub fn new(team_id: impl AsRef<str>, league_id: Option<&str>) -> Self {
        Self {
            team_id: team_id.as_ref().trim().to_string(),
            league_id: league_id.map(str::trim).filter(|id| !id.is_empty()).map(str::to_string),
        }
    }

    /// Parse `team[:league],team[:league],...`
    pub fn parse_list(raw: &str) -> anyhow::Result<Vec<Self>> {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let mut parts = item.splitn(2, ':');
                let team = parts.next().unwrap_or_default().trim();
                if team.is_empty() {
                    anyhow::bail!("tracked entry '{}' has no team id", item);
                }
                Ok(Self::new(team, parts.next()))
            })
            .collect()
    }
}

/// Largest accepted window offset, in days
pub const MAX_OFFSET_DAYS: u32 = 36_500;

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

impl FeedConfig {
    /// Load configuration: defaults, then an optional file, then environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut loaded = Self::from_sources(path)?;
        loaded.apply_env_overrides()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Defaults merged with the optional file, without env overrides or validation
    fn from_sources(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = ::config::Config::builder().add_source(
            ::config::Config::try_from(&Self::default()).context("Failed to seed default configuration")?,
        );

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(tracked) = std::env::var("MATCH_FEED_TRACKED") {
            self.tracked = TrackedEntry::parse_list(&tracked).context("Invalid MATCH_FEED_TRACKED")?;
        }

        if let Ok(days) = std::env::var("MATCH_FEED_START_OFFSET_DAYS") {
            self.window.start_offset_days =
                days.parse().context("Invalid MATCH_FEED_START_OFFSET_DAYS")?;
        }

        if let Ok(days) = std::env::var("MATCH_FEED_END_OFFSET_DAYS") {
            self.window.end_offset_days = days.parse().context("Invalid MATCH_FEED_END_OFFSET_DAYS")?;
        }

        if let Ok(ttl) = std::env::var("MATCH_FEED_CACHE_TTL_MINUTES") {
            self.cache.ttl_minutes = ttl.parse().context("Invalid MATCH_FEED_CACHE_TTL_MINUTES")?;
        }

        if let Ok(dir) = std::env::var("MATCH_FEED_DATA_DIR") {
            self.cache.data_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("MATCH_FEED_PROVIDER_URL") {
            self.provider.base_url = url;
        }

        if let Ok(minutes) = std::env::var("MATCH_FEED_REFRESH_MINUTES") {
            self.scheduler.refresh_minutes =
                minutes.parse().context("Invalid MATCH_FEED_REFRESH_MINUTES")?;
        }

        if let Ok(offset) = std::env::var("MATCH_FEED_UTC_OFFSET_MINUTES") {
            self.utc_offset_minutes = offset.parse().context("Invalid MATCH_FEED_UTC_OFFSET_MINUTES")?;
        }

        if let Ok(topic) = std::env::var("NTFY_TOPIC") {
            self.notifications.ntfy_topic = Some(topic).filter(|t| !t.trim().is_empty());
        }

        if let Ok(token) = std::env::var("NTFY_TOKEN") {
            self.notifications.ntfy_token = Some(token).filter(|t| !t.trim().is_empty());
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tracked.is_empty() {
            anyhow::bail!("at least one tracked team is required");
        }

        for entry in &self.tracked {
            if entry.team_id.trim().is_empty() {
                anyhow::bail!("tracked entry has a blank team id");
            }
            if matches!(&entry.league_id, Some(league) if league.trim().is_empty()) {
                anyhow::bail!("tracked team {} has a blank league id", entry.team_id);
            }
        }

        for (name, days) in [
            ("start_offset_days", self.window.start_offset_days),
            ("end_offset_days", self.window.end_offset_days),
        ] {
            if days > MAX_OFFSET_DAYS {
                anyhow::bail!("window {} {} exceeds {} days", name, days, MAX_OFFSET_DAYS);
            }
        }

        if self.cache.ttl_minutes == 0 {
            anyhow::bail!("cache ttl_minutes must be greater than 0");
        }

        if self.scheduler.refresh_minutes == 0 {
            anyhow::bail!("scheduler refresh_minutes must be greater than 0");
        }

        if offset_from_minutes(self.utc_offset_minutes).is_none() {
            anyhow::bail!("utc_offset_minutes {} is out of range", self.utc_offset_minutes);
        }

        Ok(())
    }

    /// The user's local calendar offset
    pub fn local_offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes).unwrap_or_else(|| Utc.fix())
    }

    /// Cache freshness window
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.cache.ttl_minutes))
    }
}

//! Same-day match notifications
//!
//! The ledger maps match id -> local calendar date of the last notification, so a
//! match is announced at most once per day. The ledger is written before the
//! transport is called; a failed send is not retried that day.

use crate::config::NotificationConfig;
use crate::error::{FeedError, Result};
use crate::format::format_kickoff;
use crate::models::Match;
use crate::status::classify_match;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use persistence::{load_json, store_json, KeyValueStore};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, warn};

type Ledger = BTreeMap<String, NaiveDate>;

/// Persisted "already notified today" ledger
pub struct NotificationGate {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl NotificationGate {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    async fn ledger(&self) -> Ledger {
        match load_json::<Ledger, _>(self.store.as_ref(), &self.key).await {
            Ok(ledger) => ledger.unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring unreadable notification ledger '{}': {}", self.key, e);
                Ledger::new()
            }
        }
    }

    /// False once `mark_sent` has recorded `today` for this match
    pub async fn should_notify(&self, match_id: &str, today: NaiveDate) -> bool {
        self.ledger().await.get(match_id) != Some(&today)
    }

    /// Record `today` against the match, replacing any earlier date
    pub async fn mark_sent(&self, match_id: &str, today: NaiveDate) -> Result<()> {
        let mut ledger = self.ledger().await;
        ledger.insert(match_id.to_string(), today);
        store_json(self.store.as_ref(), &self.key, &ledger, None).await?;
        Ok(())
    }

    pub async fn last_sent(&self, match_id: &str) -> Option<NaiveDate> {
        self.ledger().await.get(match_id).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub deep_link_url: String,
}

impl NotificationMessage {
    /// "Home vs Away" / "League - 10/19/26 at 03:00 PM"
    pub fn for_match(m: &Match, offset: FixedOffset) -> Self {
        Self {
            title: m.title(),
            body: format!("{} - {}", m.tournament.league_name, format_kickoff(m.kickoff_utc, offset)),
            deep_link_url: m.link_url.clone(),
        }
    }
}

/// Delivers a formatted notification
#[async_trait::async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<()>;
}

/// Writes notifications to the log; used when no push target is configured
pub struct LogTransport;

#[async_trait::async_trait]
impl NotificationTransport for LogTransport {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        info!("🔔 {} | {} | {}", message.title, message.body, message.deep_link_url);
        Ok(())
    }
}

/// Push through an ntfy server
pub struct NtfyTransport {
    client: Client,
    base_url: String,
    topic: Option<String>,
    token: Option<String>,
    tag: String,
}

impl NtfyTransport {
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let client = Client::builder().timeout(StdDuration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url: config.ntfy_base_url.trim_end_matches('/').to_string(),
            topic: config.ntfy_topic.clone(),
            token: config.ntfy_token.clone(),
            tag: config.tag.clone(),
        })
    }

    /// Whether both topic and token are present
    pub fn is_configured(config: &NotificationConfig) -> bool {
        config.ntfy_topic.is_some() && config.ntfy_token.is_some()
    }
}

/// RFC 2047 encoded-word so non-ASCII titles survive as HTTP headers
pub fn encode_rfc2047(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", BASE64.encode(text.as_bytes()))
}

#[async_trait::async_trait]
impl NotificationTransport for NtfyTransport {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let Some(topic) = self.topic.as_deref() else {
            return Err(FeedError::notification("ntfy topic not set"));
        };
        let Some(token) = self.token.as_deref() else {
            return Err(FeedError::notification("ntfy token not set"));
        };

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, topic))
            .header("Authorization", format!("Bearer {token}"))
            .header("Title", encode_rfc2047(&message.title))
            .header("Click", message.deep_link_url.as_str())
            .header("Tags", encode_rfc2047(&self.tag))
            .body(message.body.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: format!("ntfy/{topic}"),
                status: response.status().as_u16(),
            });
        }

        debug!("Pushed '{}' to ntfy topic {}", message.title, topic);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Match ids handed to the transport
    pub sent: Vec<String>,
    pub already_notified: usize,
    pub failed: usize,
}

/// Walks the feed and notifies today's and running matches once per day
pub struct NotificationDispatcher {
    gate: NotificationGate,
    transport: Arc<dyn NotificationTransport>,
    offset: FixedOffset,
}

impl NotificationDispatcher {
    pub fn new(gate: NotificationGate, transport: Arc<dyn NotificationTransport>, offset: FixedOffset) -> Self {
        Self { gate, transport, offset }
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    pub async fn dispatch(&self, feed: &[Match], now: DateTime<Utc>) -> DispatchReport {
        let local_now = now.with_timezone(&self.offset);
        let today = local_now.date_naive();
        let mut report = DispatchReport::default();

        for m in feed.iter().filter(|m| classify_match(m, local_now).is_notifiable()) {
            if !self.gate.should_notify(&m.id, today).await {
                report.already_notified += 1;
                continue;
            }

            if let Err(e) = self.gate.mark_sent(&m.id, today).await {
                error!("Could not record notification for match {}, not sending: {}", m.id, e);
                report.failed += 1;
                continue;
            }

            let message = NotificationMessage::for_match(m, self.offset);
            match self.transport.send(&message).await {
                Ok(()) => report.sent.push(m.id.clone()),
                Err(e) => {
                    warn!("Notification for match {} was lost: {}", m.id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

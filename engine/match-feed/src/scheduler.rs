use crate::aggregator::FeedAggregator;
use crate::cache::{FeedRead, ResultCache};
use crate::config::FeedConfig;
use crate::normalizer::MatchNormalizer;
use crate::notify::{
    DispatchReport, LogTransport, NotificationDispatcher, NotificationGate, NotificationTransport,
    NtfyTransport,
};
use crate::provider::{FixtureProvider, HttpFixtureProvider};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use persistence::{create_local_store, KeyValueStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

/// Owns the cache and the notification dispatcher and runs refresh passes
pub struct FeedScheduler {
    config: FeedConfig,
    cache: Arc<ResultCache>,
    dispatcher: Arc<NotificationDispatcher>,
}

/// What one refresh pass produced
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub read: FeedRead,
    pub notifications: Option<DispatchReport>,
}

impl FeedScheduler {
    /// Wire up HTTP provider, file-backed store and the configured transport
    pub async fn new(config: FeedConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            create_local_store(config.cache.data_dir.clone(), config.cache.namespace.clone())
                .context("Failed to open cache store")?,
        );

        let provider: Arc<dyn FixtureProvider> = Arc::new(
            HttpFixtureProvider::new(config.provider.clone()).context("Failed to create HTTP client")?,
        );

        let transport: Arc<dyn NotificationTransport> = if NtfyTransport::is_configured(&config.notifications) {
            Arc::new(NtfyTransport::new(&config.notifications).context("Failed to create ntfy client")?)
        } else {
            info!("ntfy topic/token not set, notifications go to the log only");
            Arc::new(LogTransport)
        };

        Ok(Self::with_components(config, store, provider, transport))
    }

    /// Build from explicit collaborators
    pub fn with_components(
        config: FeedConfig,
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn FixtureProvider>,
        transport: Arc<dyn NotificationTransport>,
    ) -> Self {
        let aggregator = FeedAggregator::new(
            provider,
            MatchNormalizer::new(config.provider.base_url.clone()),
            config.tracked.clone(),
            config.window.clone(),
        );
        let cache = ResultCache::new(
            Arc::clone(&store),
            aggregator,
            config.cache_ttl(),
            config.cache.feed_key.clone(),
        );
        let dispatcher = NotificationDispatcher::new(
            NotificationGate::new(store, config.cache.ledger_key.clone()),
            transport,
            config.local_offset(),
        );

        Self { config, cache: Arc::new(cache), dispatcher: Arc::new(dispatcher) }
    }

    /// Read the feed through the cache
    pub async fn feed(&self, now: DateTime<Utc>) -> FeedRead {
        self.cache.get(now).await
    }

    /// One pass: read the feed, then notify today's matches if enabled
    pub async fn run_once(&self, now: DateTime<Utc>) -> RefreshReport {
        let read = self.cache.get(now).await;

        let notifications = if self.config.notifications.enabled {
            let report = self.dispatcher.dispatch(read.feed(), now).await;
            if report.failed > 0 {
                warn!("{} notifications failed this pass", report.failed);
            }
            Some(report)
        } else {
            None
        };

        info!(
            "Refresh pass: {} matches ({:?}), {} notified",
            read.feed().len(),
            read.source,
            notifications.as_ref().map_or(0, |r| r.sent.len())
        );

        RefreshReport { read, notifications }
    }

    /// Run refresh passes forever at the configured interval
    pub async fn start(&self) -> Result<()> {
        let period = Duration::from_secs(u64::from(self.config.scheduler.refresh_minutes) * 60);
        info!("Starting feed scheduler, refreshing every {:?}", period);

        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            self.run_once(Utc::now()).await;
        }
    }
}

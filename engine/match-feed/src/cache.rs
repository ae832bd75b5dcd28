//! Read-through cache of the aggregated feed
//!
//! One persisted entry holds the last successful feed and when it was computed.
//! The entry is Fresh while `0 <= now - computed_at < ttl` and Stale otherwise;
//! there is no explicit invalidation.

use crate::aggregator::FeedAggregator;
use crate::models::Match;
use chrono::{DateTime, Duration, Utc};
use persistence::{load_json, store_json, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Persisted cache record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub feed: Vec<Match>,
    pub computed_at_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

/// Where a returned feed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// Fresh entry, no provider calls
    Cache,
    /// Recomputed and stored
    Recomputed,
    /// Recomputation failed entirely; previous entry served as-is
    StaleFallback,
    /// Nothing cached and nothing fetched
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct FeedRead {
    pub entry: CacheEntry,
    pub source: FeedSource,
}

impl FeedRead {
    pub fn feed(&self) -> &[Match] {
        &self.entry.feed
    }
}

pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    aggregator: FeedAggregator,
    ttl: Duration,
    key: String,
}

impl ResultCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        aggregator: FeedAggregator,
        ttl: Duration,
        key: impl Into<String>,
    ) -> Self {
        Self { store, aggregator, ttl, key: key.into() }
    }

    /// Load the persisted entry. Unreadable or corrupt records count as absent.
    pub async fn load(&self) -> Option<CacheEntry> {
        match load_json::<CacheEntry, _>(self.store.as_ref(), &self.key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable feed cache '{}': {}", self.key, e);
                None
            }
        }
    }

    pub fn state_of(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> CacheState {
        match entry {
            None => CacheState::Empty,
            Some(entry) => {
                let age = now - entry.computed_at_utc;
                // A timestamp from the future means the clock moved back
                if age >= Duration::zero() && age < self.ttl {
                    CacheState::Fresh
                } else {
                    CacheState::Stale
                }
            }
        }
    }

    pub async fn state(&self, now: DateTime<Utc>) -> CacheState {
        self.state_of(self.load().await.as_ref(), now)
    }

    /// Return the feed, recomputing when the entry is Empty or Stale
    pub async fn get(&self, now: DateTime<Utc>) -> FeedRead {
        let cached = self.load().await;

        if self.state_of(cached.as_ref(), now) == CacheState::Fresh {
            if let Some(entry) = cached {
                debug!("Serving cached feed computed at {}", entry.computed_at_utc);
                return FeedRead { entry, source: FeedSource::Cache };
            }
        }

        let outcome = self.aggregator.aggregate(now).await;

        if outcome.all_failed() {
            return match cached {
                Some(entry) => {
                    warn!(
                        "All {} tracked entries failed, serving stale feed from {}",
                        outcome.failed, entry.computed_at_utc
                    );
                    FeedRead { entry, source: FeedSource::StaleFallback }
                }
                None => {
                    warn!("All {} tracked entries failed and nothing is cached", outcome.failed);
                    FeedRead {
                        entry: CacheEntry { feed: Vec::new(), computed_at_utc: now },
                        source: FeedSource::Unavailable,
                    }
                }
            };
        }

        let entry = CacheEntry { feed: outcome.feed, computed_at_utc: now };

        match store_json(self.store.as_ref(), &self.key, &entry, None).await {
            Ok(()) => info!("Cached {} matches at {}", entry.feed.len(), now),
            Err(e) => warn!("Failed to persist feed cache '{}': {}", self.key, e),
        }

        FeedRead { entry, source: FeedSource::Recomputed }
    }
}

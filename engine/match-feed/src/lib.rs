//! Match Feed
//!
//! Fetches fixtures for tracked football teams, splits each team's fixtures around
//! its next match, merges everything into one windowed and deduplicated feed,
//! caches that feed for a configurable TTL, and sends at most one "happening
//! today" notification per match per day.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod normalizer;
pub mod notify;
pub mod provider;
pub mod scheduler;
pub mod status;
pub mod window;
pub mod windower;


pub use aggregator::{AggregationOutcome, FeedAggregator};
pub use cache::{CacheEntry, CacheState, FeedRead, FeedSource, ResultCache};
pub use config::{FeedConfig, TrackedEntry};
pub use error::{FeedError, Result};
pub use models::*;
pub use normalizer::MatchNormalizer;
pub use notify::{NotificationDispatcher, NotificationGate, NotificationMessage, NotificationTransport};
pub use provider::{FixtureProvider, HttpFixtureProvider};
pub use scheduler::FeedScheduler;
pub use status::MatchCategory;
pub use window::DateWindow;

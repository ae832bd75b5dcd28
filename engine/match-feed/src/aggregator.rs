//! Fan-out over tracked entries, then merge into one ordered, deduplicated feed.

use crate::config::{TrackedEntry, WindowConfig};
use crate::error::Result;
use crate::models::{Match, TeamFixtures};
use crate::normalizer::{LeagueRef, MatchNormalizer};
use crate::provider::FixtureProvider;
use crate::window::DateWindow;
use crate::windower;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub feed: Vec<Match>,
    pub succeeded: usize,
    pub failed: usize,
}

impl AggregationOutcome {
    /// Every tracked entry failed to fetch
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

pub struct FeedAggregator {
    provider: Arc<dyn FixtureProvider>,
    normalizer: MatchNormalizer,
    tracked: Vec<TrackedEntry>,
    window: WindowConfig,
}

impl FeedAggregator {
    pub fn new(
        provider: Arc<dyn FixtureProvider>,
        normalizer: MatchNormalizer,
        tracked: Vec<TrackedEntry>,
        window: WindowConfig,
    ) -> Self {
        Self { provider, normalizer, tracked, window }
    }

    /// Run one aggregation relative to `now`.
    ///
    /// Entries are fetched concurrently; a failed entry is logged and skipped.
    /// Results are buffered until all entries finish, so the output order does
    /// not depend on completion order.
    pub async fn aggregate(&self, now: DateTime<Utc>) -> AggregationOutcome {
        let window = DateWindow::around(now, &self.window);

        let fetches = self.tracked.iter().map(|entry| self.collect_entry(entry, window, now));
        let results = join_all(fetches).await;

        let mut outcome = AggregationOutcome::default();
        let mut per_entry = Vec::with_capacity(results.len());

        for (entry, result) in self.tracked.iter().zip(results) {
            match result {
                Ok(matches) => {
                    outcome.succeeded += 1;
                    per_entry.push(matches);
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        "Skipping team {} (league {:?}): {}",
                        entry.team_id, entry.league_id, e
                    );
                }
            }
        }

        outcome.feed = merge(per_entry);

        info!(
            "Aggregated {} matches from {} entries ({} failed) for window {} .. {}",
            outcome.feed.len(),
            outcome.succeeded,
            outcome.failed,
            window.start,
            window.end
        );

        outcome
    }

    async fn collect_entry(
        &self,
        entry: &TrackedEntry,
        window: DateWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>> {
        match &entry.league_id {
            Some(league_id) => {
                let league = self.provider.league_fixtures(league_id).await?;
                let league_ref = LeagueRef { league_id, league_name: &league.league_name };

                Ok(league
                    .matches
                    .iter()
                    .map(|raw| self.normalizer.normalize(raw, Some(league_ref), now))
                    .filter(|m| window.accepts_for_team(m, &entry.team_id))
                    .collect())
            }
            None => {
                let team = self.provider.team_fixtures(&entry.team_id).await?;
                Ok(self.team_candidates(team, now).into_iter().filter(|m| window.accepts(m)).collect())
            }
        }
    }

    fn team_candidates(&self, team: TeamFixtures, now: DateTime<Utc>) -> Vec<Match> {
        let fixtures: Vec<Match> =
            team.fixtures.iter().map(|raw| self.normalizer.normalize(raw, None, now)).collect();

        windower::partition(&fixtures, team.next_match_id.as_deref()).into_candidates()
    }
}

/// Concatenate per-entry results in tracked order, drop repeated ids (first wins),
/// then sort by kickoff and id.
///
/// Matches without an id cannot be deduplicated or notified and are dropped.
pub fn merge(per_entry: Vec<Vec<Match>>) -> Vec<Match> {
    let mut seen = HashSet::new();
    let mut missing_id = 0usize;
    let mut feed: Vec<Match> = per_entry
        .into_iter()
        .flatten()
        .filter(|m| {
            if m.id.is_empty() {
                missing_id += 1;
                return false;
            }
            seen.insert(m.id.clone())
        })
        .collect();

    if missing_id > 0 {
        warn!("Dropped {} matches without an id", missing_id);
    }

    feed.sort_by(|a, b| a.kickoff_utc.cmp(&b.kickoff_utc).then_with(|| a.id.cmp(&b.id)));
    feed
}

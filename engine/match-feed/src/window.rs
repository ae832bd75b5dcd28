use crate::config::WindowConfig;
use crate::models::Match;
use chrono::{DateTime, Duration, Utc};

/// Inclusive `[start, end]` kickoff window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[now - start_offset_days, now + end_offset_days]`, clamped to the representable range
    pub fn around(now: DateTime<Utc>, config: &WindowConfig) -> Self {
        Self {
            start: now
                .checked_sub_signed(Duration::days(i64::from(config.start_offset_days)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: now
                .checked_add_signed(Duration::days(i64::from(config.end_offset_days)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn accepts(&self, m: &Match) -> bool {
        self.contains(m.kickoff_utc)
    }

    /// League-mode filter: in the window and played by the tracked team
    pub fn accepts_for_team(&self, m: &Match, team_id: &str) -> bool {
        self.accepts(m) && m.involves_team(team_id)
    }
}

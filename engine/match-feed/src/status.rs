use crate::models::{Match, MatchStatus};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;

/// Display category of a match, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCategory {
    Cancelled,
    Finished,
    InProgress,
    Today,
    Upcoming,
}

impl MatchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::Cancelled => "cancelled",
            MatchCategory::Finished => "finished",
            MatchCategory::InProgress => "in-progress",
            MatchCategory::Today => "today",
            MatchCategory::Upcoming => "upcoming",
        }
    }

    /// Only today's and running matches may trigger a notification
    pub fn is_notifiable(&self) -> bool {
        matches!(self, MatchCategory::Today | MatchCategory::InProgress)
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify with fixed precedence: cancelled > finished > in-progress > today > upcoming.
///
/// "Today" compares calendar dates in `now`'s offset, not the match venue's.
pub fn classify(status: &MatchStatus, kickoff_utc: DateTime<Utc>, now: DateTime<FixedOffset>) -> MatchCategory {
    if status.cancelled {
        MatchCategory::Cancelled
    } else if status.finished {
        MatchCategory::Finished
    } else if status.started && status.is_ongoing() {
        MatchCategory::InProgress
    } else if kickoff_utc.with_timezone(now.offset()).date_naive() == now.date_naive() {
        MatchCategory::Today
    } else {
        MatchCategory::Upcoming
    }
}

pub fn classify_match(m: &Match, now: DateTime<FixedOffset>) -> MatchCategory {
    classify(&m.status, m.kickoff_utc, now)
}

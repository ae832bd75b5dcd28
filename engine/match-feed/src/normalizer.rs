//! Raw provider record -> canonical [`Match`].

use crate::models::{
    Match, MatchStatus, RawId, RawMatch, RawSide, Side, StatusReason, Tournament,
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Fallback tournament for records that carry none (league overview rows)
#[derive(Debug, Clone, Copy)]
pub struct LeagueRef<'a> {
    pub league_id: &'a str,
    pub league_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct MatchNormalizer {
    site_base_url: String,
}

impl MatchNormalizer {
    pub fn new(site_base_url: impl Into<String>) -> Self {
        Self { site_base_url: site_base_url.into().trim_end_matches('/').to_string() }
    }

    /// Build the canonical match.
    ///
    /// Never fails: absent optional fields get defaults and a missing or
    /// unparseable kickoff becomes `now` so the match stays displayable.
    pub fn normalize(&self, raw: &RawMatch, fallback: Option<LeagueRef<'_>>, now: DateTime<Utc>) -> Match {
        let raw_status = raw.status.clone().unwrap_or_default();

        let kickoff_utc = match raw_status.utc_time.as_deref().map(DateTime::parse_from_rfc3339) {
            Some(Ok(ts)) => ts.with_timezone(&Utc),
            Some(Err(e)) => {
                debug!("Unparseable kickoff {:?} on match {:?}: {}", raw_status.utc_time, raw.id, e);
                now
            }
            None => now,
        };

        let status = MatchStatus {
            started: raw_status.started.unwrap_or(false),
            cancelled: raw_status.cancelled.unwrap_or(false),
            finished: raw_status.finished.unwrap_or(false),
            ongoing: raw_status.ongoing,
            reason: raw_status.reason.map(|r| StatusReason {
                short_text: r.short.unwrap_or_default(),
                long_text: r.long.unwrap_or_default(),
            }),
        };

        let home = side(raw.home.as_ref());
        let away = side(raw.away.as_ref());

        let tournament = match (&raw.tournament, fallback) {
            (Some(t), _) if t.league_id.is_some() => Tournament {
                league_id: t.league_id.as_ref().map(RawId::canonical).unwrap_or_default(),
                league_name: t
                    .name
                    .clone()
                    .or_else(|| fallback.map(|f| f.league_name.to_string()))
                    .unwrap_or_default(),
            },
            (_, Some(f)) => Tournament {
                league_id: f.league_id.trim().to_string(),
                league_name: f.league_name.to_string(),
            },
            (Some(t), None) => Tournament {
                league_id: String::new(),
                league_name: t.name.clone().unwrap_or_default(),
            },
            (None, None) => Tournament { league_id: String::new(), league_name: String::new() },
        };

        let winner = if status.finished { determine_winner(&home, &away) } else { String::new() };

        let page_url = raw.page_url.clone().unwrap_or_default();
        let link_url = format!("{}{}", self.site_base_url, page_url);

        Match {
            id: raw.id.as_ref().map(RawId::canonical).unwrap_or_default(),
            kickoff_utc,
            home,
            away,
            tournament,
            status,
            winner,
            page_url,
            link_url,
        }
    }
}

fn side(raw: Option<&RawSide>) -> Side {
    match raw {
        Some(raw) => Side {
            team_id: raw.id.as_ref().map(RawId::canonical).unwrap_or_default(),
            team_name: raw.name.clone().unwrap_or_default(),
            score: raw.score,
        },
        None => Side { team_id: String::new(), team_name: String::new(), score: None },
    }
}

/// Winner of a finished match; an absent score counts as 0
pub fn determine_winner(home: &Side, away: &Side) -> String {
    let home_score = home.score.unwrap_or(0);
    let away_score = away.score.unwrap_or(0);

    match home_score.cmp(&away_score) {
        std::cmp::Ordering::Greater => home.team_name.clone(),
        std::cmp::Ordering::Less => away.team_name.clone(),
        std::cmp::Ordering::Equal => "draw".to_string(),
    }
}

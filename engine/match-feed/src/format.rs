//! Text helpers for the presentation layer and notification bodies.

use crate::models::Match;
use chrono::{DateTime, FixedOffset, Utc};

/// `MM/DD/YY at hh:mm AM` in the given offset
pub fn format_kickoff(kickoff_utc: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = kickoff_utc.with_timezone(&offset);
    format!("{} at {}", local.format("%m/%d/%y"), local.format("%I:%M %p"))
}

/// Group the feed by league name.
///
/// Leagues appear in the order their first match appears; matches keep feed order.
pub fn group_by_league(feed: &[Match]) -> Vec<(String, Vec<Match>)> {
    let mut groups: Vec<(String, Vec<Match>)> = Vec::new();

    for m in feed {
        match groups.iter_mut().find(|(name, _)| *name == m.tournament.league_name) {
            Some((_, matches)) => matches.push(m.clone()),
            None => groups.push((m.tournament.league_name.clone(), vec![m.clone()])),
        }
    }

    groups
}

/// One-line summary: "Liverpool vs Arsenal (2 - 1)" for finished matches
pub fn match_line(m: &Match) -> String {
    if m.status.finished {
        format!(
            "{} ({} - {})",
            m.title(),
            m.home.score.unwrap_or(0),
            m.away.score.unwrap_or(0)
        )
    } else {
        m.title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, Side, Tournament};
    use chrono::TimeZone;

    fn fixture(id: &str, league: &str) -> Match {
        Match {
            id: id.to_string(),
            kickoff_utc: Utc.with_ymd_and_hms(2026, 10, 19, 19, 5, 0).unwrap(),
            home: Side { team_id: "1".into(), team_name: "Liverpool".into(), score: Some(2) },
            away: Side { team_id: "2".into(), team_name: "Arsenal".into(), score: None },
            tournament: Tournament { league_id: "47".into(), league_name: league.into() },
            status: MatchStatus::default(),
            winner: String::new(),
            page_url: String::new(),
            link_url: String::new(),
        }
    }

    #[test]
    fn test_format_kickoff() {
        let kickoff = Utc.with_ymd_and_hms(2026, 10, 19, 19, 5, 0).unwrap();
        let eastern = FixedOffset::west_opt(4 * 3600).unwrap();

        assert_eq!(format_kickoff(kickoff, eastern), "10/19/26 at 03:05 PM");
        assert_eq!(format_kickoff(kickoff, FixedOffset::east_opt(0).unwrap()), "10/19/26 at 07:05 PM");
    }

    #[test]
    fn test_group_by_league_keeps_order() {
        let feed = vec![
            fixture("1", "Premier League"),
            fixture("2", "Champions League"),
            fixture("3", "Premier League"),
        ];

        let groups = group_by_league(&feed);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Premier League");
        assert_eq!(groups[0].1.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(groups[1].0, "Champions League");
    }

    #[test]
    fn test_match_line() {
        let mut m = fixture("1", "Premier League");
        assert_eq!(match_line(&m), "Liverpool vs Arsenal");

        m.status.finished = true;
        assert_eq!(match_line(&m), "Liverpool vs Arsenal (2 - 0)");
    }
}

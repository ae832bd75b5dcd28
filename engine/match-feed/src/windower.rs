use crate::models::{Match, TeamFixtureView};

/// Split one team's fixtures around the reference match.
///
/// `fixtures` is assumed sorted by kickoff. Without a reference, or with one that
/// is not in the list, nothing can be anchored and every partition is empty.
pub fn partition(fixtures: &[Match], reference_match_id: Option<&str>) -> TeamFixtureView {
    let Some(reference) = reference_match_id else {
        return TeamFixtureView::default();
    };

    let Some(idx) = fixtures.iter().position(|m| m.id == reference) else {
        return TeamFixtureView::default();
    };

    let anchor = &fixtures[idx];
    let ongoing_match = anchor.status.is_ongoing().then(|| anchor.clone());
    let next_start = if ongoing_match.is_some() { idx + 1 } else { idx };

    TeamFixtureView {
        previous_matches: fixtures[..idx].to_vec(),
        ongoing_match,
        next_matches: fixtures[next_start..].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, Side, Tournament};
    use chrono::{Duration, TimeZone, Utc};

    fn fixture(id: &str, day: i64, ongoing: bool) -> Match {
        let side = |name: &str| Side { team_id: name.to_lowercase(), team_name: name.to_string(), score: None };
        Match {
            id: id.to_string(),
            kickoff_utc: Utc.with_ymd_and_hms(2026, 10, 1, 15, 0, 0).unwrap() + Duration::days(day),
            home: side("Home"),
            away: side("Away"),
            tournament: Tournament { league_id: "47".to_string(), league_name: "Premier League".to_string() },
            status: MatchStatus { started: ongoing, ongoing: Some(ongoing), ..Default::default() },
            winner: String::new(),
            page_url: String::new(),
            link_url: String::new(),
        }
    }

    fn ids(matches: &[Match]) -> Vec<&str> {
        matches.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_ongoing_reference() {
        let fixtures = vec![fixture("1", 0, false), fixture("2", 7, true), fixture("3", 14, false)];

        let view = partition(&fixtures, Some("2"));

        assert_eq!(ids(&view.previous_matches), vec!["1"]);
        assert_eq!(view.ongoing_match.as_ref().map(|m| m.id.as_str()), Some("2"));
        assert_eq!(ids(&view.next_matches), vec!["3"]);
    }

    #[test]
    fn test_upcoming_reference_keeps_last_fixture() {
        let fixtures = vec![fixture("1", 0, false), fixture("2", 7, false), fixture("3", 14, false)];

        let view = partition(&fixtures, Some("2"));

        assert_eq!(ids(&view.previous_matches), vec!["1"]);
        assert!(view.ongoing_match.is_none());
        assert_eq!(ids(&view.next_matches), vec!["2", "3"]);
    }

    #[test]
    fn test_partition_reconstructs_source() {
        let fixtures: Vec<Match> =
            (0..6).map(|i| fixture(&i.to_string(), i * 7, i == 3)).collect();

        for reference in &fixtures {
            let view = partition(&fixtures, Some(&reference.id));

            let mut rebuilt = view.previous_matches.clone();
            rebuilt.extend(view.ongoing_match.clone());
            rebuilt.extend(view.next_matches.clone());

            assert_eq!(rebuilt, fixtures, "reference {}", reference.id);
        }
    }

    #[test]
    fn test_reference_at_edges() {
        let fixtures = vec![fixture("1", 0, false), fixture("2", 7, false)];

        let first = partition(&fixtures, Some("1"));
        assert!(first.previous_matches.is_empty());
        assert_eq!(ids(&first.next_matches), vec!["1", "2"]);

        let last = partition(&fixtures, Some("2"));
        assert_eq!(ids(&last.previous_matches), vec!["1"]);
        assert_eq!(ids(&last.next_matches), vec!["2"]);
    }

    #[test]
    fn test_missing_anchor_yields_empty_view() {
        let fixtures = vec![fixture("1", 0, false), fixture("2", 7, false)];

        assert!(partition(&fixtures, None).is_empty());
        assert!(partition(&fixtures, Some("99")).is_empty());
        assert!(partition(&[], Some("1")).is_empty());
        assert!(partition(&[], None).is_empty());
    }

    #[test]
    fn test_candidates_skip_ongoing() {
        let fixtures = vec![fixture("1", 0, false), fixture("2", 7, true), fixture("3", 14, false)];

        let candidates = partition(&fixtures, Some("2")).into_candidates();
        assert_eq!(ids(&candidates), vec!["1", "3"]);
    }
}

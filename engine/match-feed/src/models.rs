use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider id, which shows up as a JSON string in some payloads and a number in others
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    /// Canonical string form used for every id comparison
    pub fn canonical(&self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => canonical_id(s),
        }
    }
}

/// Trim an id and drop leading zeros from purely numeric ids so "08650" == 8650
pub fn canonical_id(id: &str) -> String {
    let trimmed = id.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        return if stripped.is_empty() { "0".to_string() } else { stripped.to_string() };
    }
    trimmed.to_string()
}

/// Match record as returned by the provider. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub id: Option<RawId>,
    pub page_url: Option<String>,
    pub home: Option<RawSide>,
    pub away: Option<RawSide>,
    pub tournament: Option<RawTournament>,
    pub status: Option<RawStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSide {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub score: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTournament {
    pub league_id: Option<RawId>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    pub utc_time: Option<String>,
    pub started: Option<bool>,
    pub cancelled: Option<bool>,
    pub finished: Option<bool>,
    pub ongoing: Option<bool>,
    pub reason: Option<RawReason>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReason {
    pub short: Option<String>,
    pub long: Option<String>,
}

/// Team endpoint payload: `fixtures.allFixtures.{fixtures, nextMatch}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamDetailPayload {
    pub fixtures: Option<TeamFixturesSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFixturesSection {
    pub all_fixtures: Option<AllFixtures>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllFixtures {
    #[serde(default)]
    pub fixtures: Vec<RawMatch>,
    pub next_match: Option<RawMatch>,
}

/// League endpoint payload: `details.name` + `overview.leagueOverviewMatches`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaguePayload {
    pub details: Option<LeagueDetails>,
    pub overview: Option<LeagueOverview>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueDetails {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueOverview {
    #[serde(default)]
    pub league_overview_matches: Vec<RawMatch>,
}

/// One team's fixtures plus the provider's designated next match
#[derive(Debug, Clone, Default)]
pub struct TeamFixtures {
    pub fixtures: Vec<RawMatch>,
    pub next_match_id: Option<String>,
}

impl From<TeamDetailPayload> for TeamFixtures {
    fn from(payload: TeamDetailPayload) -> Self {
        let all = payload.fixtures.and_then(|f| f.all_fixtures).unwrap_or_default();
        let next_match_id =
            all.next_match.as_ref().and_then(|m| m.id.as_ref()).map(RawId::canonical);
        Self { fixtures: all.fixtures, next_match_id }
    }
}

/// Flat list of a league's matches plus the league display name
#[derive(Debug, Clone, Default)]
pub struct LeagueFixtures {
    pub league_name: String,
    pub matches: Vec<RawMatch>,
}

impl From<LeaguePayload> for LeagueFixtures {
    fn from(payload: LeaguePayload) -> Self {
        Self {
            league_name: payload.details.and_then(|d| d.name).unwrap_or_default(),
            matches: payload.overview.map(|o| o.league_overview_matches).unwrap_or_default(),
        }
    }
}

/// One side of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    pub team_id: String,
    pub team_name: String,
    pub score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub league_id: String,
    pub league_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReason {
    pub short_text: String,
    pub long_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatus {
    pub started: bool,
    pub cancelled: bool,
    pub finished: bool,
    /// `None` when the provider did not say
    pub ongoing: Option<bool>,
    pub reason: Option<StatusReason>,
}

impl MatchStatus {
    /// Provider flags the match as currently being played
    pub fn is_ongoing(&self) -> bool {
        self.ongoing == Some(true)
    }
}

/// Canonical match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub kickoff_utc: DateTime<Utc>,
    pub home: Side,
    pub away: Side,
    pub tournament: Tournament,
    pub status: MatchStatus,
    /// Home name, away name, "draw", or "" until finished
    pub winner: String,
    pub page_url: String,
    pub link_url: String,
}

impl Match {
    /// Whether either side is the given team (ids compared canonically)
    pub fn involves_team(&self, team_id: &str) -> bool {
        let team_id = canonical_id(team_id);
        canonical_id(&self.home.team_id) == team_id || canonical_id(&self.away.team_id) == team_id
    }

    /// "Home vs Away"
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home.team_name, self.away.team_name)
    }
}

/// A team's fixtures split around the provider's reference match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFixtureView {
    pub previous_matches: Vec<Match>,
    pub ongoing_match: Option<Match>,
    pub next_matches: Vec<Match>,
}

impl TeamFixtureView {
    /// Candidates contributed to the feed: previous then next.
    ///
    /// The ongoing match sits at the boundary and is not added again.
    pub fn into_candidates(self) -> Vec<Match> {
        let mut candidates = self.previous_matches;
        candidates.extend(self.next_matches);
        candidates
    }

    pub fn is_empty(&self) -> bool {
        self.previous_matches.is_empty() && self.ongoing_match.is_none() && self.next_matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_ids() {
        assert_eq!(canonical_id(" 8650 "), "8650");
        assert_eq!(canonical_id("08650"), "8650");
        assert_eq!(canonical_id("000"), "0");
        assert_eq!(canonical_id("abc-1"), "abc-1");
        assert_eq!(RawId::Number(8650).canonical(), RawId::Text("8650".into()).canonical());
    }

    #[test]
    fn test_team_payload_decoding() {
        let json = r#"{
            "fixtures": {
                "allFixtures": {
                    "fixtures": [
                        {"id": 1, "home": {"id": 8650, "name": "Liverpool", "score": 2},
                         "away": {"id": "9825", "name": "Arsenal"},
                         "status": {"utcTime": "2026-10-12T14:00:00.000Z", "finished": true}},
                        {"id": "2", "pageUrl": "/matches/x"}
                    ],
                    "nextMatch": {"id": 2, "status": {"ongoing": true}}
                }
            }
        }"#;

        let payload: TeamDetailPayload = serde_json::from_str(json).unwrap();
        let team = TeamFixtures::from(payload);

        assert_eq!(team.fixtures.len(), 2);
        assert_eq!(team.next_match_id.as_deref(), Some("2"));
        let home = team.fixtures[0].home.as_ref().unwrap();
        assert_eq!(home.id, Some(RawId::Number(8650)));
        assert_eq!(home.score, Some(2));
    }

    #[test]
    fn test_team_payload_without_fixtures() {
        let payload: TeamDetailPayload = serde_json::from_str("{}").unwrap();
        let team = TeamFixtures::from(payload);
        assert!(team.fixtures.is_empty());
        assert!(team.next_match_id.is_none());
    }

    #[test]
    fn test_league_payload_decoding() {
        let json = r#"{
            "details": {"name": "Premier League"},
            "overview": {"leagueOverviewMatches": [{"id": "7"}]}
        }"#;

        let league = LeagueFixtures::from(serde_json::from_str::<LeaguePayload>(json).unwrap());
        assert_eq!(league.league_name, "Premier League");
        assert_eq!(league.matches.len(), 1);

        let empty = LeagueFixtures::from(serde_json::from_str::<LeaguePayload>("{}").unwrap());
        assert_eq!(empty.league_name, "");
        assert!(empty.matches.is_empty());
    }
}

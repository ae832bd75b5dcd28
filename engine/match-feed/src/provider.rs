use crate::config::ProviderConfig;
use crate::error::{FeedError, Result};
use crate::models::{LeagueFixtures, LeaguePayload, TeamDetailPayload, TeamFixtures};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration as StdDuration;
use tracing::{debug, info};

/// Source of raw fixtures
#[async_trait::async_trait]
pub trait FixtureProvider: Send + Sync {
    /// All fixtures of one team plus the designated next match
    async fn team_fixtures(&self, team_id: &str) -> Result<TeamFixtures>;

    /// Overview matches of one league
    async fn league_fixtures(&self, league_id: &str) -> Result<LeagueFixtures>;
}

/// HTTP fixture provider. One attempt per call, bounded by the client timeout.
pub struct HttpFixtureProvider {
    config: ProviderConfig,
    client: Client,
}

impl HttpFixtureProvider {
    /// Create a new provider instance
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url(), endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl FixtureProvider for HttpFixtureProvider {
    async fn team_fixtures(&self, team_id: &str) -> Result<TeamFixtures> {
        let payload: TeamDetailPayload = self.get_json("/api/teams", &[("id", team_id)]).await?;
        let fixtures = TeamFixtures::from(payload);

        info!(
            "Fetched {} fixtures for team {} (next match: {:?})",
            fixtures.fixtures.len(),
            team_id,
            fixtures.next_match_id
        );
        Ok(fixtures)
    }

    async fn league_fixtures(&self, league_id: &str) -> Result<LeagueFixtures> {
        let payload: LeaguePayload = self
            .get_json(
                "/api/leagues",
                &[
                    ("id", league_id),
                    ("tab", "overview"),
                    ("type", "league"),
                    ("timeZone", self.config.time_zone.as_str()),
                ],
            )
            .await?;
        let fixtures = LeagueFixtures::from(payload);

        info!(
            "Fetched {} overview matches for league {} ({})",
            fixtures.matches.len(),
            league_id,
            fixtures.league_name
        );
        Ok(fixtures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::tests::serve_once;

    fn provider_at(base_url: String) -> HttpFixtureProvider {
        let mut config = FeedConfig::default().provider;
        config.base_url = base_url;
        config.timeout_secs = 5;
        HttpFixtureProvider::new(config).unwrap()
    }

    #[test]
    fn test_provider_creation_trims_base_url() {
        let mut config = FeedConfig::default().provider;
        config.base_url = "https://www.fotmob.com/".to_string();

        let provider = HttpFixtureProvider::new(config).unwrap();
        assert_eq!(provider.base_url(), "https://www.fotmob.com");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let mut config = FeedConfig::default().provider;
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;

        let provider = HttpFixtureProvider::new(config).unwrap();
        assert!(provider.team_fixtures("8650").await.is_err());
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (base_url, server) = serve_once("503 Service Unavailable", "").await;

        match provider_at(base_url).league_fixtures("47").await {
            Err(FeedError::Status { endpoint, status }) => {
                assert_eq!(status, 503);
                assert_eq!(endpoint, "/api/leagues");
            }
            other => panic!("expected a status error, got {other:?}"),
        }

        let request = server.await.unwrap();
        assert_eq!(
            request.request_line,
            "GET /api/leagues?id=47&tab=overview&type=league&timeZone=America%2FNew_York HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_team_payload_is_decoded() {
        let body = r#"{"fixtures":{"allFixtures":{"fixtures":[{"id":1},{"id":2}],"nextMatch":{"id":2}}}}"#;
        let (base_url, server) = serve_once("200 OK", body).await;

        let team = provider_at(base_url).team_fixtures("8650").await.unwrap();
        assert_eq!(team.fixtures.len(), 2);
        assert_eq!(team.next_match_id.as_deref(), Some("2"));

        assert_eq!(server.await.unwrap().request_line, "GET /api/teams?id=8650 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let (base_url, _server) = serve_once("200 OK", "<html>").await;

        let result = provider_at(base_url).team_fixtures("8650").await;
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }
}

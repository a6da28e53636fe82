//! HTTP client with retry for the schedule feed

use super::{parse_events, ScheduleError, TeamSchedule};
use crate::config::ScheduleConfig;
use crate::models::Game;
use reqwest::StatusCode;
use std::time::Duration;

/// Schedule feed client
pub struct ScheduleClient {
    client: reqwest::Client,
    config: ScheduleConfig,
}

impl ScheduleClient {
    /// Create a new client with the given configuration
    pub fn new(config: ScheduleConfig) -> Result<Self, ScheduleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Build URL for a team's events ("last" or "next")
    fn events_url(&self, team_id: u64, direction: &str) -> String {
        format!(
            "{}/team/{}/events/{}/0",
            self.config.base_url.trim_end_matches('/'),
            team_id,
            direction
        )
    }

    fn team_id(&self) -> Result<u64, ScheduleError> {
        self.config.team_id.ok_or(ScheduleError::NotConfigured)
    }

    /// Fetch a URL with retry and linearly increasing backoff
    async fn fetch_text(&self, url: &str) -> Result<String, ScheduleError> {
        let attempts = self.config.max_retries.max(1);

        for attempt in 0..attempts {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(ScheduleError::RequestFailed);
                    }
                    // The feed answers 404 when a team has no events that way
                    if status == StatusCode::NOT_FOUND {
                        return Err(ScheduleError::NotFound(url.to_string()));
                    }
                    tracing::warn!(
                        "Request failed with status {} (attempt {}/{})",
                        status,
                        attempt + 1,
                        attempts
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt + 1,
                        attempts,
                        e
                    );
                }
            }

            if attempt + 1 < attempts {
                let backoff = Duration::from_millis(self.config.delay_ms * (attempt as u64 + 1));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(ScheduleError::RetriesExhausted {
            url: url.to_string(),
            attempts,
        })
    }

    async fn fetch_events(&self, direction: &str) -> Result<Vec<Game>, ScheduleError> {
        let url = self.events_url(self.team_id()?, direction);
        tracing::info!("Fetching schedule: {}", url);

        match self.fetch_text(&url).await {
            Ok(body) => parse_events(&body),
            Err(ScheduleError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Most recent games (completed or in progress)
    pub async fn fetch_recent(&self) -> Result<Vec<Game>, ScheduleError> {
        self.fetch_events("last").await
    }

    /// Next scheduled games
    pub async fn fetch_upcoming(&self) -> Result<Vec<Game>, ScheduleError> {
        self.fetch_events("next").await
    }

    /// Recent and upcoming games, ordered and limited for display
    pub async fn fetch_schedule(&self) -> Result<TeamSchedule, ScheduleError> {
        let mut games = self.fetch_recent().await?;
        games.extend(self.fetch_upcoming().await?);

        Ok(TeamSchedule::from_games(
            games,
            self.config.recent_limit,
            self.config.upcoming_limit,
        ))
    }

    /// Like [`fetch_schedule`](Self::fetch_schedule), but never fails
    pub async fn fetch_schedule_or_empty(&self) -> TeamSchedule {
        match self.fetch_schedule().await {
            Ok(schedule) => schedule,
            Err(ScheduleError::NotConfigured) => {
                tracing::info!("Schedule feed not configured, skipping");
                TeamSchedule::empty(ScheduleError::NotConfigured.to_string())
            }
            Err(e) => {
                tracing::warn!("Schedule unavailable: {}", e);
                TeamSchedule::empty(format!("Schedule unavailable: {}", e))
            }
        }
    }
}

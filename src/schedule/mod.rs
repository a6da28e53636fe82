//! Team schedule feed
//!
//! Fetches a team's recent and upcoming games over HTTP for display next to
//! the ledger. Failures never take the ledger down with them: use
//! [`ScheduleClient::fetch_schedule_or_empty`] to get an empty schedule and a
//! warning instead.
//!
//! # Example
//!
//! ```no_run
//! use bet_tracker::config::ScheduleConfig;
//! use bet_tracker::schedule::ScheduleClient;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScheduleConfig {
//!         team_id: Some(3691),
//!         ..Default::default()
//!     };
//!     let client = ScheduleClient::new(config)?;
//!
//!     let schedule = client.fetch_schedule().await?;
//!     println!("{} recent, {} upcoming", schedule.recent.len(), schedule.upcoming.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod events;

pub use client::ScheduleClient;
pub use events::parse_events;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Game;

/// Schedule feed errors
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Failed to parse schedule payload: {0}")]
    ParseError(String),

    #[error("No events at {0}")]
    NotFound(String),

    #[error("Failed to fetch {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("No team configured for the schedule feed")]
    NotConfigured,
}

/// Recent results and upcoming games for one team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub fetched_at: DateTime<Utc>,
    /// Completed games, newest first
    pub recent: Vec<Game>,
    /// Games not yet completed, soonest first
    pub upcoming: Vec<Game>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TeamSchedule {
    /// Schedule with no games, carrying the reason it is empty
    pub fn empty(warning: impl Into<String>) -> Self {
        Self {
            fetched_at: Utc::now(),
            recent: Vec::new(),
            upcoming: Vec::new(),
            warning: Some(warning.into()),
        }
    }

    /// Split games by completion, order them and apply the display limits
    pub fn from_games(games: Vec<Game>, recent_limit: usize, upcoming_limit: usize) -> Self {
        let (mut recent, mut upcoming): (Vec<Game>, Vec<Game>) =
            games.into_iter().partition(|g| g.is_completed);

        recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent.truncate(recent_limit);

        upcoming.sort_by_key(|g| g.start_time);
        upcoming.truncate(upcoming_limit);

        Self {
            fetched_at: Utc::now(),
            recent,
            upcoming,
            warning: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.upcoming.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(ts: i64, completed: bool) -> Game {
        Game {
            home: format!("Home {}", ts),
            away: "Away".to_string(),
            home_score: completed.then_some(3),
            away_score: completed.then_some(1),
            is_completed: completed,
            start_time: DateTime::from_timestamp(ts, 0).unwrap(),
            winner: None,
        }
    }

    #[test]
    fn test_from_games_split_and_order() {
        let games = vec![
            game(100, true),
            game(500, false),
            game(300, true),
            game(400, false),
            game(200, true),
        ];
        let schedule = TeamSchedule::from_games(games, 2, 5);

        let recent: Vec<i64> = schedule.recent.iter().map(|g| g.start_time.timestamp()).collect();
        let upcoming: Vec<i64> = schedule
            .upcoming
            .iter()
            .map(|g| g.start_time.timestamp())
            .collect();

        assert_eq!(recent, vec![300, 200]);
        assert_eq!(upcoming, vec![400, 500]);
        assert!(schedule.warning.is_none());
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = TeamSchedule::empty("feed down");
        assert!(schedule.is_empty());
        assert_eq!(schedule.warning.as_deref(), Some("feed down"));
    }
}

//! Team event payload parsing
//!
//! The feed returns `{"events": [...]}` where each event carries team names,
//! optional current scores, a status type, a start timestamp and a winner
//! code (1 = home, 2 = away, 3 = draw).

use chrono::DateTime;
use serde::Deserialize;

use super::ScheduleError;
use crate::models::{Game, GameWinner};

#[derive(Debug, Deserialize)]
struct EventsPayload {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    home_team: RawTeam,
    away_team: RawTeam,
    #[serde(default)]
    home_score: Option<RawScore>,
    #[serde(default)]
    away_score: Option<RawScore>,
    status: RawStatus,
    start_timestamp: i64,
    #[serde(default)]
    winner_code: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawScore {
    #[serde(default)]
    current: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(rename = "type")]
    kind: String,
}

/// Parse a team events payload into games
///
/// Only a payload that is not an events object is an error. Single events
/// that are malformed or carry an out-of-range start timestamp are dropped
/// with a warning.
pub fn parse_events(json: &str) -> Result<Vec<Game>, ScheduleError> {
    let payload: EventsPayload =
        serde_json::from_str(json).map_err(|e| ScheduleError::ParseError(e.to_string()))?;

    let games = payload
        .events
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let event: RawEvent = match serde_json::from_value(value) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("Dropping event {}: {}", i, e);
                    return None;
                }
            };

            let Some(start_time) = DateTime::from_timestamp(event.start_timestamp, 0) else {
                tracing::warn!(
                    "Dropping {} vs {}: bad start timestamp {}",
                    event.home_team.name,
                    event.away_team.name,
                    event.start_timestamp
                );
                return None;
            };

            let winner = match event.winner_code {
                Some(1) => Some(GameWinner::Home),
                Some(2) => Some(GameWinner::Away),
                Some(3) => Some(GameWinner::Draw),
                _ => None,
            };

            Some(Game {
                home: event.home_team.name,
                away: event.away_team.name,
                home_score: event.home_score.and_then(|s| s.current),
                away_score: event.away_score.and_then(|s| s.current),
                is_completed: event.status.kind == "finished",
                start_time,
                winner,
            })
        })
        .collect();

    Ok(games)
}

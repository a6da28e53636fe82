use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::odds::apply_boost;
use crate::core::settlement::settle;
use crate::error::{
    validate_amount, validate_boost, validate_odds, validate_required, LedgerError, Result,
};

/// Settlement state of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    #[default]
    Pending,
    Win,
    Loss,
    Void,
}

impl BetResult {
    pub fn all() -> [BetResult; 4] {
        [BetResult::Pending, BetResult::Win, BetResult::Loss, BetResult::Void]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetResult::Pending => "pending",
            BetResult::Win => "win",
            BetResult::Loss => "loss",
            BetResult::Void => "void",
        }
    }

    /// Whether the outcome has been decided
    pub fn is_settled(&self) -> bool {
        !matches!(self, BetResult::Pending)
    }

    /// Whether the outcome counts toward the W-L record
    pub fn counts_in_record(&self) -> bool {
        matches!(self, BetResult::Win | BetResult::Loss)
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetResult {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "" => Ok(BetResult::Pending),
            "win" | "won" => Ok(BetResult::Win),
            "loss" | "lost" => Ok(BetResult::Loss),
            "void" | "push" => Ok(BetResult::Void),
            other => Err(LedgerError::UnknownResult(other.to_string())),
        }
    }
}

/// A single wager in the ledger
///
/// `profit` is derived from (odds, amount, result) and only ever written by
/// [`Bet::recompute`] / [`Bet::resettle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub date: NaiveDate,
    pub game: String,
    pub legs: Vec<String>,
    /// Price used for settlement (after any boost)
    pub odds: i32,
    /// Price before any boost was applied
    pub initial_odds: i32,
    /// Raw multiplier applied to the profit margin (0 = none)
    pub boost: f64,
    pub amount: f64,
    pub result: BetResult,
    pub profit: f64,
}

impl Bet {
    /// Validate a form submission and build a settled bet from it
    pub fn from_new(new: NewBet) -> Result<Self> {
        validate_required("game", &new.game)?;
        validate_odds(new.odds)?;
        validate_amount(new.amount)?;
        validate_boost(new.boost)?;

        let (odds, initial_odds) = if new.boost > 0.0 {
            (apply_boost(new.odds, new.boost)?, new.odds)
        } else {
            let initial = new.initial_odds.unwrap_or(new.odds);
            validate_odds(initial)?;
            (new.odds, initial)
        };

        let legs = new
            .legs
            .into_iter()
            .map(|leg| leg.trim().to_string())
            .filter(|leg| !leg.is_empty())
            .collect();

        let mut bet = Bet {
            date: new.date,
            game: new.game.trim().to_string(),
            legs,
            odds,
            initial_odds,
            boost: new.boost,
            amount: new.amount,
            result: new.result,
            profit: 0.0,
        };
        bet.recompute()?;

        Ok(bet)
    }

    /// Recompute profit from the stored raw fields
    pub fn recompute(&mut self) -> Result<()> {
        self.profit = settle(self.odds, self.amount, self.result)?;
        Ok(())
    }

    /// Set a new result and recompute profit from scratch
    pub fn resettle(&mut self, result: BetResult) -> Result<f64> {
        self.profit = settle(self.odds, self.amount, result)?;
        self.result = result;
        Ok(self.profit)
    }

    pub fn is_boosted(&self) -> bool {
        self.boost > 0.0 && self.odds != self.initial_odds
    }
}

/// Bet entry as submitted, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBet {
    pub date: NaiveDate,
    pub game: String,
    #[serde(default)]
    pub legs: Vec<String>,
    /// American odds as offered (before boost)
    pub odds: i32,
    /// Pre-boost price when `odds` is already boosted and `boost` is 0
    #[serde(default)]
    pub initial_odds: Option<i32>,
    #[serde(default)]
    pub boost: f64,
    pub amount: f64,
    #[serde(default)]
    pub result: BetResult,
}

/// Roster member sharing in the ledger's profit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub units: u32,
}

impl Participant {
    pub fn new(name: impl Into<String>, units: u32) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }
}

/// Which side won a completed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameWinner {
    Home,
    Away,
    Draw,
}

/// Game from the schedule feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub home: String,
    pub away: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub is_completed: bool,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<GameWinner>,
}

impl Game {
    /// "Home 3 - 2 Away" for finished games, "Away @ Home" otherwise
    pub fn scoreline(&self) -> String {
        match (self.is_completed, self.home_score, self.away_score) {
            (true, Some(h), Some(a)) => format!("{} {} - {} {}", self.home, h, a, self.away),
            _ => format!("{} @ {}", self.away, self.home),
        }
    }
}

/// Parse a bet date, discarding any time component
///
/// Accepts `2024-11-02`, `2024-11-02 19:00:00`, `2024-11-02T19:00:00Z` and
/// `11/02/2024`.
pub fn parse_bet_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Ok(date);
    }

    Err(LedgerError::InvalidDate(raw.to_string()))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub bet_count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Password submission
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Session state after a login attempt
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub edit_allowed: bool,
}

/// Re-settle request
#[derive(Debug, Serialize, Deserialize)]
pub struct SettleRequest {
    pub result: BetResult,
}

/// Bet with its position in the loaded ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedBet {
    pub index: usize,
    #[serde(flatten)]
    pub bet: Bet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bet() -> NewBet {
        NewBet {
            date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            game: "Caps vs Rangers".to_string(),
            legs: vec!["Caps ML".to_string(), " Ovechkin to score ".to_string()],
            odds: -110,
            initial_odds: None,
            boost: 0.0,
            amount: 100.0,
            result: BetResult::Pending,
        }
    }

    #[test]
    fn test_result_parse() {
        assert_eq!("win".parse::<BetResult>().unwrap(), BetResult::Win);
        assert_eq!("LOSS".parse::<BetResult>().unwrap(), BetResult::Loss);
        assert_eq!("push".parse::<BetResult>().unwrap(), BetResult::Void);
        assert_eq!("".parse::<BetResult>().unwrap(), BetResult::Pending);
        assert!("maybe".parse::<BetResult>().is_err());
    }

    #[test]
    fn test_result_display_roundtrip() {
        for result in BetResult::all() {
            assert_eq!(result.to_string().parse::<BetResult>().unwrap(), result);
        }
    }

    #[test]
    fn test_result_record_membership() {
        assert!(BetResult::Win.counts_in_record());
        assert!(BetResult::Loss.counts_in_record());
        assert!(!BetResult::Void.counts_in_record());
        assert!(!BetResult::Pending.counts_in_record());
        assert!(BetResult::Void.is_settled());
        assert!(!BetResult::Pending.is_settled());
    }

    #[test]
    fn test_from_new_pending() {
        let bet = Bet::from_new(new_bet()).unwrap();
        assert_eq!(bet.profit, 0.0);
        assert_eq!(bet.initial_odds, -110);
        assert_eq!(bet.legs, vec!["Caps ML", "Ovechkin to score"]);
        assert!(!bet.is_boosted());
    }

    #[test]
    fn test_from_new_applies_boost() {
        let mut new = new_bet();
        new.boost = 2.0;
        new.result = BetResult::Win;
        let bet = Bet::from_new(new).unwrap();

        assert_eq!(bet.initial_odds, -110);
        assert_eq!(bet.odds, 182);
        assert_eq!(bet.profit, 182.0);
        assert!(bet.is_boosted());
    }

    #[test]
    fn test_from_new_keeps_explicit_initial_odds() {
        let mut new = new_bet();
        new.odds = 120;
        new.initial_odds = Some(-105);
        let bet = Bet::from_new(new).unwrap();
        assert_eq!(bet.odds, 120);
        assert_eq!(bet.initial_odds, -105);
    }

    #[test]
    fn test_from_new_rejects_invalid() {
        let mut zero_odds = new_bet();
        zero_odds.odds = 0;
        assert!(matches!(
            Bet::from_new(zero_odds),
            Err(LedgerError::InvalidOdds(0))
        ));

        let mut no_game = new_bet();
        no_game.game = "  ".to_string();
        assert!(matches!(
            Bet::from_new(no_game),
            Err(LedgerError::MissingField("game"))
        ));

        let mut no_stake = new_bet();
        no_stake.amount = 0.0;
        assert!(Bet::from_new(no_stake).is_err());
    }

    #[test]
    fn test_resettle_roundtrip() {
        let mut new = new_bet();
        new.result = BetResult::Win;
        let mut bet = Bet::from_new(new).unwrap();
        let original = bet.profit;

        assert_eq!(bet.resettle(BetResult::Loss).unwrap(), -100.0);
        assert_eq!(bet.resettle(BetResult::Void).unwrap(), 0.0);
        assert_eq!(bet.resettle(BetResult::Pending).unwrap(), 0.0);
        assert_eq!(bet.resettle(BetResult::Win).unwrap(), original);
        assert_eq!(bet.result, BetResult::Win);
    }

    #[test]
    fn test_parse_bet_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        assert_eq!(parse_bet_date("2024-11-02").unwrap(), expected);
        assert_eq!(parse_bet_date("2024-11-02 19:30:00").unwrap(), expected);
        assert_eq!(parse_bet_date("2024-11-02T19:30:00").unwrap(), expected);
        assert_eq!(parse_bet_date("2024-11-02T19:30:00Z").unwrap(), expected);
        assert_eq!(parse_bet_date("11/02/2024").unwrap(), expected);
        assert!(parse_bet_date("yesterday").is_err());
    }

    #[test]
    fn test_new_bet_deserialize_defaults() {
        let json = r#"{"date":"2024-11-02","game":"Caps vs Bruins","odds":-120,"amount":25.0}"#;
        let new: NewBet = serde_json::from_str(json).unwrap();
        assert!(new.legs.is_empty());
        assert_eq!(new.boost, 0.0);
        assert_eq!(new.result, BetResult::Pending);
        assert_eq!(new.initial_odds, None);
    }

    #[test]
    fn test_game_scoreline() {
        let game = Game {
            home: "Capitals".to_string(),
            away: "Rangers".to_string(),
            home_score: Some(4),
            away_score: Some(2),
            is_completed: true,
            start_time: DateTime::from_timestamp(1_730_000_000, 0).unwrap(),
            winner: Some(GameWinner::Home),
        };
        assert_eq!(game.scoreline(), "Capitals 4 - 2 Rangers");

        let upcoming = Game {
            is_completed: false,
            home_score: None,
            away_score: None,
            winner: None,
            ..game
        };
        assert_eq!(upcoming.scoreline(), "Rangers @ Capitals");
    }
}

//! Ledger Metrics
//!
//! ROI, hit rate, profit factor and drawdown over settled bets.

use serde::{Deserialize, Serialize};

use super::odds::to_decimal_odds;
use super::settlement::round_cents;
use crate::models::{Bet, BetResult};

/// Performance metrics for settled, non-void bets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerMetrics {
    pub settled_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub hit_rate: f64,

    pub total_staked: f64,
    pub net_profit: f64,
    pub roi: f64,

    pub gross_profit: f64,
    pub gross_loss: f64,
    /// `None` when there are winnings but no losses
    pub profit_factor: Option<f64>,

    /// Mean decimal odds
    pub avg_odds: f64,
    pub avg_stake: f64,
    pub max_drawdown: f64,
}

impl Default for LedgerMetrics {
    fn default() -> Self {
        Self {
            settled_bets: 0,
            wins: 0,
            losses: 0,
            hit_rate: 0.0,
            total_staked: 0.0,
            net_profit: 0.0,
            roi: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            profit_factor: Some(0.0),
            avg_odds: 0.0,
            avg_stake: 0.0,
            max_drawdown: 0.0,
        }
    }
}

/// Calculate metrics from the ledger
pub fn calculate_metrics(bets: &[Bet]) -> LedgerMetrics {
    let mut settled: Vec<&Bet> = bets
        .iter()
        .filter(|b| b.result.counts_in_record())
        .collect();

    if settled.is_empty() {
        return LedgerMetrics::default();
    }

    // Drawdown is measured along the bankroll's path through time
    settled.sort_by_key(|b| b.date);

    let settled_bets = settled.len();
    let wins = settled.iter().filter(|b| b.result == BetResult::Win).count();
    let losses = settled_bets - wins;
    let hit_rate = wins as f64 / settled_bets as f64;

    let total_staked: f64 = settled.iter().map(|b| b.amount).sum();
    let net_profit: f64 = settled.iter().map(|b| b.profit).sum();
    let gross_profit: f64 = settled.iter().map(|b| b.profit).filter(|&p| p > 0.0).sum();
    let gross_loss: f64 = settled
        .iter()
        .map(|b| b.profit)
        .filter(|&p| p < 0.0)
        .map(f64::abs)
        .sum();

    let profit_factor = if gross_loss > 0.0 {
        Some(gross_profit / gross_loss)
    } else if gross_profit > 0.0 {
        None
    } else {
        Some(0.0)
    };

    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;
    for bet in &settled {
        cumulative += bet.profit;
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.max(peak - cumulative);
    }

    // Average the price, not the signed American quote
    let decimals: Vec<f64> = settled
        .iter()
        .filter_map(|b| to_decimal_odds(b.odds).ok())
        .collect();
    let avg_odds = if decimals.is_empty() {
        0.0
    } else {
        decimals.iter().sum::<f64>() / decimals.len() as f64
    };

    let roi = if total_staked > 0.0 {
        net_profit / total_staked
    } else {
        0.0
    };

    LedgerMetrics {
        settled_bets,
        wins,
        losses,
        hit_rate,
        total_staked: round_cents(total_staked),
        net_profit: round_cents(net_profit),
        roi,
        gross_profit: round_cents(gross_profit),
        gross_loss: round_cents(gross_loss),
        profit_factor,
        avg_odds,
        avg_stake: round_cents(total_staked / settled_bets as f64),
        max_drawdown: round_cents(max_drawdown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bet(day: u32, odds: i32, amount: f64, result: BetResult) -> Bet {
        let mut bet = Bet {
            date: NaiveDate::from_ymd_opt(2024, 12, day).unwrap(),
            game: "Caps".to_string(),
            legs: vec![],
            odds,
            initial_odds: odds,
            boost: 0.0,
            amount,
            result,
            profit: 0.0,
        };
        bet.recompute().unwrap();
        bet
    }

    #[test]
    fn test_metrics_empty() {
        let m = calculate_metrics(&[]);
        assert_eq!(m.settled_bets, 0);
        assert_eq!(m.roi, 0.0);
    }

    #[test]
    fn test_metrics_ignores_void_and_pending() {
        let bets = vec![
            bet(1, 100, 10.0, BetResult::Void),
            bet(2, 100, 10.0, BetResult::Pending),
        ];
        assert_eq!(calculate_metrics(&bets), LedgerMetrics::default());
    }

    #[test]
    fn test_metrics_basic() {
        let bets = vec![
            bet(1, 100, 100.0, BetResult::Win),  // +100
            bet(2, 100, 100.0, BetResult::Loss), // -100
            bet(3, 100, 100.0, BetResult::Loss), // -100
            bet(4, 300, 100.0, BetResult::Win),  // +300
        ];
        let m = calculate_metrics(&bets);

        assert_eq!(m.settled_bets, 4);
        assert_eq!(m.wins, 2);
        assert_eq!(m.losses, 2);
        assert!((m.hit_rate - 0.5).abs() < 1e-9);
        assert_eq!(m.total_staked, 400.0);
        assert_eq!(m.net_profit, 200.0);
        assert!((m.roi - 0.5).abs() < 1e-9);
        assert_eq!(m.gross_profit, 400.0);
        assert_eq!(m.gross_loss, 200.0);
        assert!((m.profit_factor.unwrap() - 2.0).abs() < 1e-9);
        // Decimal 2.0, 2.0, 2.0, 4.0
        assert!((m.avg_odds - 2.5).abs() < 1e-9);
        // Peak 100 after day 1, trough -100 after day 3
        assert_eq!(m.max_drawdown, 200.0);
    }

    #[test]
    fn test_metrics_drawdown_uses_date_order() {
        let bets = vec![
            bet(3, 100, 50.0, BetResult::Win),
            bet(1, 100, 50.0, BetResult::Loss),
            bet(2, 100, 50.0, BetResult::Loss),
        ];
        // Path: -50, -100, -50 from a peak of 0
        assert_eq!(calculate_metrics(&bets).max_drawdown, 100.0);
    }

    #[test]
    fn test_avg_odds_mixed_signs() {
        let bets = vec![
            bet(1, -110, 110.0, BetResult::Win),
            bet(2, 110, 100.0, BetResult::Loss),
        ];
        let m = calculate_metrics(&bets);
        // (1.909 + 2.1) / 2
        let expected = (100.0 / 110.0 + 1.0 + 2.1) / 2.0;
        assert!((m.avg_odds - expected).abs() < 1e-9);
        assert!(m.avg_odds > 1.0);
    }

    #[test]
    fn test_profit_factor_no_losses() {
        let bets = vec![bet(1, 100, 10.0, BetResult::Win)];
        assert_eq!(calculate_metrics(&bets).profit_factor, None);
    }
}

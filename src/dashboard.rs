//! Ledger dashboard
//!
//! One render cycle: everything shown is recomputed from the stored bets
//! and the roster. Nothing here is cached between calls.

use serde::{Deserialize, Serialize};

use crate::core::{
    allocate, calculate_metrics, cumulative_series, summary, LedgerMetrics, ParticipantShare,
    SeriesPoint, Summary,
};
use crate::models::{Bet, IndexedBet, Participant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub shares: Vec<ParticipantShare>,
    pub series: Vec<SeriesPoint>,
    pub metrics: LedgerMetrics,
    /// Newest first
    pub history: Vec<IndexedBet>,
}

impl Dashboard {
    pub fn build(bets: &[Bet], participants: &[Participant]) -> Self {
        let summary = summary(bets);
        let shares = allocate(summary.total_profit, participants);

        Self {
            shares,
            series: cumulative_series(bets),
            metrics: calculate_metrics(bets),
            history: history(bets),
            summary,
        }
    }
}

/// Bets newest first, each tagged with its position in the loaded ledger
///
/// Bets on the same date keep the reverse of their entry order.
pub fn history(bets: &[Bet]) -> Vec<IndexedBet> {
    let mut indexed: Vec<IndexedBet> = bets
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, bet)| IndexedBet { index, bet })
        .collect();

    indexed.sort_by(|a, b| b.bet.date.cmp(&a.bet.date).then(b.index.cmp(&a.index)));
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BetResult;
    use chrono::NaiveDate;

    fn bet(day: u32, odds: i32, amount: f64, result: BetResult) -> Bet {
        let mut bet = Bet {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            game: format!("Caps game {}", day),
            legs: vec!["Caps ML".to_string()],
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
    fn test_build_dashboard() {
        let bets = vec![
            bet(2, 100, 50.0, BetResult::Win),
            bet(1, -200, 40.0, BetResult::Win),
            bet(2, 150, 10.0, BetResult::Loss),
        ];
        let roster = vec![Participant::new("Alex", 10), Participant::new("Ben", 5)];
        let dash = Dashboard::build(&bets, &roster);

        assert_eq!(dash.summary.total_profit, 60.0);
        assert_eq!(dash.summary.record_display, "2-1");
        assert_eq!(dash.shares[0].share, 60.0);
        assert_eq!(dash.shares[1].share, 30.0);
        assert_eq!(dash.series.len(), 2);
        assert_eq!(dash.series[1].cumulative_profit, 60.0);
        assert_eq!(dash.metrics.settled_bets, 3);
    }

    #[test]
    fn test_build_is_repeatable() {
        let bets = vec![bet(1, -110, 100.0, BetResult::Win)];
        let roster = vec![Participant::new("Alex", 10)];
        let first = Dashboard::build(&bets, &roster);
        let second = Dashboard::build(&bets, &roster);
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.shares, second.shares);
    }

    #[test]
    fn test_dashboard_clone_keeps_history() {
        let bets = vec![bet(1, -110, 100.0, BetResult::Win), bet(2, 120, 10.0, BetResult::Pending)];
        let dash = Dashboard::build(&bets, &[Participant::new("Alex", 10)]);
        let copy = dash.clone();
        assert_eq!(copy.history.len(), 2);
        assert_eq!(copy.history[0].index, 1);
        assert_eq!(copy.history[0].bet, dash.history[0].bet);
    }

    #[test]
    fn test_history_newest_first() {
        let bets = vec![
            bet(1, 100, 10.0, BetResult::Pending),
            bet(3, 100, 10.0, BetResult::Pending),
            bet(3, 120, 10.0, BetResult::Pending),
            bet(2, 100, 10.0, BetResult::Pending),
        ];
        let order: Vec<usize> = history(&bets).iter().map(|b| b.index).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_empty_ledger() {
        let dash = Dashboard::build(&[], &[Participant::new("Alex", 10)]);
        assert_eq!(dash.summary.total_bets, 0);
        assert_eq!(dash.shares[0].share, 0.0);
        assert!(dash.series.is_empty());
        assert!(dash.history.is_empty());
    }
}

//! Ledger aggregation: totals, bankroll series, record, profit shares

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::settlement::round_cents;
use crate::models::{Bet, BetResult, Participant};

/// Denominator used when converting units into a profit share
pub const SHARE_DENOMINATOR: f64 = 10.0;

/// One point of the bankroll chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub daily_profit: f64,
    pub cumulative_profit: f64,
}

/// Participant's slice of total profit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub name: String,
    pub units: u32,
    pub share: f64,
}

/// Win/loss tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: usize,
    pub losses: usize,
    pub voids: usize,
    pub pending: usize,
}

impl Record {
    /// "W-L", voids and pending excluded
    pub fn display(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Headline figures for the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_bets: usize,
    pub record: Record,
    pub record_display: String,
    pub total_profit: f64,
}

/// Sum of profit over all bets; pending and void contribute 0
pub fn total_profit(bets: &[Bet]) -> f64 {
    round_cents(bets.iter().map(|b| b.profit).sum())
}

/// Cumulative profit per calendar day
///
/// Only days with at least one bet appear, in ascending order.
pub fn cumulative_series(bets: &[Bet]) -> Vec<SeriesPoint> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for bet in bets {
        *daily.entry(bet.date).or_insert(0.0) += bet.profit;
    }

    let mut running = 0.0;
    daily
        .into_iter()
        .map(|(date, profit)| {
            running += profit;
            SeriesPoint {
                date,
                daily_profit: round_cents(profit),
                cumulative_profit: round_cents(running),
            }
        })
        .collect()
}

/// Split total profit across the roster by unit weight
///
/// Each share is `total * units / 10`, so shares only add up to the total
/// when the roster's units sum to 10.
// TODO: divide by the roster's total units once everyone agrees on how
// existing shares should be restated.
pub fn allocate(total_profit: f64, participants: &[Participant]) -> Vec<ParticipantShare> {
    participants
        .iter()
        .map(|p| ParticipantShare {
            name: p.name.clone(),
            units: p.units,
            share: round_cents(total_profit * (p.units as f64 / SHARE_DENOMINATOR)),
        })
        .collect()
}

/// Count results; voids are tallied separately from the W-L record
pub fn record(bets: &[Bet]) -> Record {
    bets.iter().fold(Record::default(), |mut rec, bet| {
        match bet.result {
            BetResult::Win => rec.wins += 1,
            BetResult::Loss => rec.losses += 1,
            BetResult::Void => rec.voids += 1,
            BetResult::Pending => rec.pending += 1,
        }
        rec
    })
}

pub fn summary(bets: &[Bet]) -> Summary {
    let record = record(bets);
    Summary {
        total_bets: bets.len(),
        record,
        record_display: record.display(),
        total_profit: total_profit(bets),
    }
}

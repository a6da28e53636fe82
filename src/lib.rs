//! Bet Tracker - personal sports-betting ledger
//!
//! This library provides:
//! - American/decimal odds conversion and promotional boosts
//! - Bet settlement and re-settlement
//! - Ledger aggregation: totals, bankroll series, W-L record, profit shares
//! - CSV-backed bet storage
//! - Shared-password edit gate with signed session tokens
//! - Team schedule feed (with the `schedule` feature)
//!
//! # Example
//!
//! ```
//! use bet_tracker::core::{allocate, settle};
//! use bet_tracker::models::{BetResult, Participant};
//!
//! let profit = settle(-110, 100.0, BetResult::Win).unwrap();
//! assert_eq!(profit, 90.91);
//!
//! let shares = allocate(100.0, &[Participant::new("Alex", 5)]);
//! assert_eq!(shares[0].share, 50.0);
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod models;

#[cfg(feature = "schedule")]
pub mod schedule;

// Re-export commonly used types
pub use auth::AuthGate;
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use data::BetStore;
pub use error::LedgerError;
pub use models::{Bet, BetResult, Game, NewBet, Participant};

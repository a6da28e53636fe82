//! Core business logic modules

pub mod aggregation;
pub mod metrics;
pub mod odds;
pub mod settlement;

// Re-export commonly used types
pub use aggregation::{
    allocate, cumulative_series, record, summary, total_profit, ParticipantShare, Record,
    SeriesPoint, Summary,
};
pub use metrics::{calculate_metrics, LedgerMetrics};
pub use odds::{apply_boost, decimal_to_american, implied_probability, to_decimal_odds};
pub use settlement::{round_cents, settle};

//! Odds conversion and promotional boosts
//!
//! American odds:
//!     +150 = win 150 on a 100 stake (underdog)
//!     -110 = risk 110 to win 100 (favorite)
//!
//! Decimal odds are the total return per unit staked, stake included:
//!     +150 -> 2.50
//!     -110 -> 1.909...

use crate::error::{validate_boost, validate_odds, LedgerError, Result};

/// Convert American odds to decimal odds
///
/// # Examples
/// ```
/// use bet_tracker::core::odds::to_decimal_odds;
/// assert_eq!(to_decimal_odds(150).unwrap(), 2.5);
/// assert!((to_decimal_odds(-110).unwrap() - 1.909).abs() < 0.001);
/// assert!(to_decimal_odds(0).is_err());
/// ```
pub fn to_decimal_odds(american: i32) -> Result<f64> {
    validate_odds(american)?;

    let american = american as f64;
    if american > 0.0 {
        Ok(american / 100.0 + 1.0)
    } else {
        Ok(100.0 / american.abs() + 1.0)
    }
}

/// Convert decimal odds back to (unrounded) American odds
pub fn decimal_to_american(decimal: f64) -> Result<f64> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(LedgerError::InvalidDecimalOdds(decimal));
    }

    margin_to_american(decimal - 1.0)
}

/// Probability implied by the price, ignoring vig
pub fn implied_probability(american: i32) -> Result<f64> {
    Ok(1.0 / to_decimal_odds(american)?)
}

/// Apply a promotional boost to American odds
///
/// `boost` is a raw multiplier on the profit margin (`decimal - 1`), not a
/// percentage increase of the price: a boost of 2.0 doubles the margin,
/// 0.5 halves it. Zero means no boost and returns the odds unchanged.
///
/// The result is rounded to whole American odds. Callers keep the original
/// price separately as the bet's initial odds.
pub fn apply_boost(american: i32, boost: f64) -> Result<i32> {
    let decimal = to_decimal_odds(american)?;
    validate_boost(boost)?;

    if boost <= 0.0 {
        return Ok(american);
    }

    let margin = (decimal - 1.0) * boost;
    let boosted = margin_to_american(margin)?;

    Ok(boosted.round() as i32)
}

/// Profit margin per unit staked -> American odds
fn margin_to_american(margin: f64) -> Result<f64> {
    if !margin.is_finite() || margin <= 0.0 {
        return Err(LedgerError::InvalidDecimalOdds(margin + 1.0));
    }

    if margin >= 1.0 {
        Ok(margin * 100.0)
    } else {
        Ok(-100.0 / margin)
    }
}

//! Bet settlement
//!
//! Profit is always recomputed from (odds, amount, result). Nothing here
//! keeps running state, so re-settling a bet any number of times yields the
//! same figure.

use crate::error::{validate_amount, validate_odds, Result};
use crate::models::BetResult;

/// Round a currency amount to cents
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid displaying "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Signed profit of a bet
///
/// | result  | profit                  |
/// |---------|-------------------------|
/// | win     | amount * margin         |
/// | loss    | -amount                 |
/// | void    | 0                       |
/// | pending | 0                       |
///
/// # Examples
/// ```
/// use bet_tracker::core::settlement::settle;
/// use bet_tracker::models::BetResult;
///
/// assert_eq!(settle(-110, 100.0, BetResult::Win).unwrap(), 90.91);
/// assert_eq!(settle(150, 100.0, BetResult::Win).unwrap(), 150.0);
/// assert_eq!(settle(150, 100.0, BetResult::Loss).unwrap(), -100.0);
/// ```
pub fn settle(odds: i32, amount: f64, result: BetResult) -> Result<f64> {
    validate_odds(odds)?;
    validate_amount(amount)?;

    let profit = match result {
        BetResult::Win => {
            if odds > 0 {
                amount * (odds as f64 / 100.0)
            } else {
                amount * (100.0 / (odds as f64).abs())
            }
        }
        BetResult::Loss => -amount,
        BetResult::Void | BetResult::Pending => 0.0,
    };

    Ok(round_cents(profit))
}

/// Amount returned to the bettor on settlement (stake + profit)
pub fn payout(odds: i32, amount: f64, result: BetResult) -> Result<f64> {
    let profit = settle(odds, amount, result)?;
    Ok(match result {
        BetResult::Loss => 0.0,
        BetResult::Pending => 0.0,
        BetResult::Win | BetResult::Void => round_cents(amount + profit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;

    #[test]
    fn test_settle_win_favorite() {
        let profit = settle(-110, 100.0, BetResult::Win).unwrap();
        assert!((profit - 90.91).abs() < 1e-9);
    }

    #[test]
    fn test_settle_win_underdog() {
        assert_eq!(settle(150, 100.0, BetResult::Win).unwrap(), 150.0);
    }

    #[test]
    fn test_settle_loss_any_odds() {
        for &odds in &[-500, -110, 100, 150, 900] {
            assert_eq!(settle(odds, 100.0, BetResult::Loss).unwrap(), -100.0);
        }
    }

    #[test]
    fn test_settle_void_and_pending() {
        for &odds in &[-110, 150] {
            assert_eq!(settle(odds, 100.0, BetResult::Void).unwrap(), 0.0);
            assert_eq!(settle(odds, 100.0, BetResult::Pending).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_settle_rounds_to_cents() {
        // 10 * 100/115 = 8.69565...
        assert_eq!(settle(-115, 10.0, BetResult::Win).unwrap(), 8.70);
    }

    #[test]
    fn test_settle_zero_odds_rejected() {
        assert!(matches!(
            settle(0, 100.0, BetResult::Win),
            Err(LedgerError::InvalidOdds(0))
        ));
        // Rejected even when the result would not need the price
        assert!(settle(0, 100.0, BetResult::Pending).is_err());
    }

    #[test]
    fn test_settle_non_positive_amount_rejected() {
        assert!(settle(-110, 0.0, BetResult::Win).is_err());
        assert!(settle(-110, -10.0, BetResult::Loss).is_err());
    }

    #[test]
    fn test_resettle_has_no_drift() {
        let first = settle(-135, 37.5, BetResult::Win).unwrap();
        let mut last = first;
        for _ in 0..100 {
            let _ = settle(-135, 37.5, BetResult::Loss).unwrap();
            last = settle(-135, 37.5, BetResult::Win).unwrap();
        }
        assert_eq!(first, last);
    }

    #[test]
    fn test_payout() {
        assert_eq!(payout(150, 100.0, BetResult::Win).unwrap(), 250.0);
        assert_eq!(payout(150, 100.0, BetResult::Void).unwrap(), 100.0);
        assert_eq!(payout(150, 100.0, BetResult::Loss).unwrap(), 0.0);
    }

    #[test]
    fn test_round_cents_negative_zero() {
        let v = round_cents(-0.001);
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
    }
}

//! Rounding rules for monetary amounts.
//!
//! Payroll amounts are rounded half-up (midpoint away from zero). Tax,
//! deductions and exemptions are whole currency units; attendance proration
//! keeps 2 decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to a whole currency unit, half-up.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_whole;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_whole(Decimal::from_str("12500.5").unwrap()), Decimal::from(12501));
/// assert_eq!(round_whole(Decimal::from_str("12500.49").unwrap()), Decimal::from(12500));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to 2 decimal places, half-up.
///
/// The result always carries a scale of 2, so it renders as `"42000.00"`.
pub fn round_2dp(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

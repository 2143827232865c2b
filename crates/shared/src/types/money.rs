//! Monetary precision rules.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` carrying at most two fractional
//! digits (piastres), and "balanced" comparisons use a fixed tolerance.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits stored for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Tolerance for balance comparisons (0.01).
///
/// Two sums are considered equal when their absolute difference is strictly
/// below this value.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest magnitude a `NUMERIC(18, 2)` column holds: 9999999999999999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2);

/// Returns true if `a` and `b` differ by less than [`BALANCE_TOLERANCE`].
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < BALANCE_TOLERANCE
}

/// Returns true if the amount needs no more than [`MONEY_SCALE`] fractional digits.
#[must_use]
pub fn has_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if the amount fits a stored money column.
#[must_use]
pub fn within_money_range(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Rounds to [`MONEY_SCALE`] digits using Banker's Rounding and pads the
/// scale so the value always serializes with two fractional digits.
#[must_use]
pub fn to_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

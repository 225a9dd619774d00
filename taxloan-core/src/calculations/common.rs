//! Shared helpers for the calculators: argument validation, percentage
//! arithmetic that reports overflow instead of panicking, and display
//! rounding.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CalculationError, CalculationResult};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Calculators keep full precision; this is applied when a value is shown.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxloan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(33214.30981)), dec!(33214.31));
/// assert_eq!(round_half_up(dec!(17999.945)), dec!(17999.95));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Fails with `InvalidInput` unless `value > 0`.
pub fn require_positive(
    field: &'static str,
    value: Decimal,
) -> CalculationResult<Decimal> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(CalculationError::invalid_input(
            field,
            format!("must be greater than zero, got {value}"),
        ))
    }
}

pub(crate) fn checked_mul(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> CalculationResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

pub(crate) fn checked_add(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> CalculationResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

pub(crate) fn checked_div(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> CalculationResult<Decimal> {
    a.checked_div(b).ok_or_else(|| overflow(field))
}

/// `amount × rate_percent / 100`.
pub(crate) fn percent_of(
    field: &'static str,
    amount: Decimal,
    rate_percent: Decimal,
) -> CalculationResult<Decimal> {
    checked_mul(field, amount, rate_percent / Decimal::ONE_HUNDRED)
}

/// `base^exponent` by repeated multiplication; avoids `powd` drift.
pub(crate) fn compound(
    field: &'static str,
    base: Decimal,
    exponent: u32,
) -> CalculationResult<Decimal> {
    (0..exponent).try_fold(Decimal::ONE, |acc, _| checked_mul(field, acc, base))
}

fn overflow(field: &'static str) -> CalculationError {
    CalculationError::invalid_input(field, "value is too large to compute")
}

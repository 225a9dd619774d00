//! Fixed-installment loan amortization and its inverse.
//!
//! With monthly rate `i = annual / 100 / 12` and `n = years × 12` months:
//!
//! | Direction            | Formula                                  |
//! |----------------------|------------------------------------------|
//! | principal → payment  | `P × i × (1+i)^n / ((1+i)^n − 1)`        |
//! | payment → principal  | `A × (1 − (1+i)^(−n)) / i`               |
//!
//! The annual rate must be strictly positive; at zero both formulas divide
//! by zero, so that case is rejected up front rather than producing a
//! meaningless result.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxloan_core::calculations::common::round_half_up;
//! use taxloan_core::calculations::{compute_amortization, compute_max_principal};
//!
//! let loan = compute_amortization(dec!(1000000), dec!(12), 3).unwrap();
//! assert_eq!(round_half_up(loan.installment), dec!(33214.31));
//!
//! let max = compute_max_principal(loan.installment, dec!(12), 3).unwrap();
//! assert_eq!(round_half_up(max.principal), dec!(1000000.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{checked_div, checked_mul, compound, require_positive};
use crate::error::{CalculationError, CalculationResult};

/// Shortest supported loan term in years.
pub const MIN_YEARS: u32 = 1;
/// Longest supported loan term in years.
pub const MAX_YEARS: u32 = 5;

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Monthly installment.
    pub installment: Decimal,
    pub total_payment: Decimal,
    pub total_interest: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseAmortizationResult {
    /// Largest principal the installment repays over the term.
    pub principal: Decimal,
    pub total_payment: Decimal,
    pub total_interest: Decimal,
}

/// Monthly rate, month count and `(1+i)^n` for a validated term.
#[derive(Debug, Clone, Copy)]
struct MonthlyTerms {
    rate: Decimal,
    months: u32,
    growth: Decimal,
}

impl MonthlyTerms {
    fn new(
        annual_rate_percent: Decimal,
        years: u32,
    ) -> CalculationResult<Self> {
        let annual_rate_percent = require_positive("annual rate", annual_rate_percent)?;
        if !(MIN_YEARS..=MAX_YEARS).contains(&years) {
            return Err(CalculationError::invalid_input(
                "years",
                format!("must be between {MIN_YEARS} and {MAX_YEARS}, got {years}"),
            ));
        }

        let rate = annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);
        let months = years * MONTHS_PER_YEAR;
        let growth = compound("annual rate", Decimal::ONE + rate, months)?;

        Ok(Self {
            rate,
            months,
            growth,
        })
    }

    fn total_of(
        &self,
        installment: Decimal,
    ) -> CalculationResult<Decimal> {
        checked_mul("installment", installment, Decimal::from(self.months))
    }
}

/// Computes the monthly installment that repays `principal` over `years`.
///
/// # Errors
///
/// Returns `InvalidInput` if `principal` or `annual_rate_percent` is not
/// greater than zero, if `years` is outside `1..=5`, or if the installment
/// cannot be represented.
pub fn compute_amortization(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> CalculationResult<AmortizationResult> {
    let principal = require_positive("principal", principal)?;
    let terms = MonthlyTerms::new(annual_rate_percent, years)?;

    let interest = checked_mul("principal", principal, terms.rate)?;
    let numerator = checked_mul("principal", interest, terms.growth)?;
    let installment = checked_div("principal", numerator, terms.growth - Decimal::ONE)?;
    let total_payment = terms.total_of(installment)?;
    let total_interest = total_payment - principal;

    debug!(
        %principal,
        %annual_rate_percent,
        months = terms.months,
        %installment,
        "amortization computed"
    );

    Ok(AmortizationResult {
        installment,
        total_payment,
        total_interest,
    })
}

/// Computes the largest principal a monthly `installment` repays over
/// `years`.
///
/// # Errors
///
/// Same conditions as [`compute_amortization`], with `installment` in place
/// of `principal`.
pub fn compute_max_principal(
    installment: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> CalculationResult<ReverseAmortizationResult> {
    let installment = require_positive("installment", installment)?;
    let terms = MonthlyTerms::new(annual_rate_percent, years)?;

    let discount = Decimal::ONE / terms.growth;
    let annuity_factor = checked_div("annual rate", Decimal::ONE - discount, terms.rate)?;
    let principal = checked_mul("installment", installment, annuity_factor)?;
    let total_payment = terms.total_of(installment)?;
    let total_interest = total_payment - principal;

    debug!(
        %installment,
        %annual_rate_percent,
        months = terms.months,
        %principal,
        "max principal computed"
    );

    Ok(ReverseAmortizationResult {
        principal,
        total_payment,
        total_interest,
    })
}

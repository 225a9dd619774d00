//! Progressive (slab) tax over a [`BracketTable`].
//!
//! Each band's rate applies only to the slice of the amount that falls inside
//! that band. Bands are walked in order; the walk stops at the first band
//! whose limit is not exceeded, so later bands never contribute.
//!
//! The same routine serves both fixed schedules:
//! [`BracketTable::payroll`] for monthly salary and
//! [`BracketTable::annual_income`] for yearly income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxloan_core::BracketTable;
//! use taxloan_core::calculations::compute_progressive_tax;
//!
//! let result = compute_progressive_tax(dec!(1500000), &BracketTable::annual_income()).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(18000));
//! assert_eq!(result.net_amount, dec!(1482000));
//! assert_eq!(result.breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BracketTable;
use crate::calculations::common::{checked_add, checked_mul, max, percent_of, require_positive};
use crate::error::CalculationResult;

/// One band actually touched by the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    /// First unit taxed in this band (`previous limit + 1`).
    pub lower_bound: Decimal,
    /// The band's limit, or the amount itself for the final band.
    pub upper_bound: Decimal,
    pub rate_percent: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveTaxResult {
    pub total_tax: Decimal,
    pub net_amount: Decimal,
    pub effective_rate_percent: Decimal,
    pub breakdown: Vec<TaxBreakdownEntry>,
}

/// Computes progressive tax on `amount` using `table`.
///
/// # Errors
///
/// Returns `InvalidInput` if `amount` is not greater than zero, or if the
/// tax on a band cannot be represented.
pub fn compute_progressive_tax(
    amount: Decimal,
    table: &BracketTable,
) -> CalculationResult<ProgressiveTaxResult> {
    let amount = require_positive("amount", amount)?;

    let mut previous_limit = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for row in table.rows() {
        let consumed = row.upper_limit.filter(|limit| amount > *limit);

        let (taxable, upper_bound) = match consumed {
            Some(limit) => (limit - previous_limit, limit),
            None => (max(amount - previous_limit, Decimal::ZERO), amount),
        };
        let tax = percent_of("amount", taxable, row.rate_percent)?;
        total_tax = checked_add("amount", total_tax, tax)?;

        if taxable > Decimal::ZERO {
            breakdown.push(TaxBreakdownEntry {
                lower_bound: previous_limit + Decimal::ONE,
                upper_bound,
                rate_percent: row.rate_percent,
                taxable_amount: taxable,
                tax_amount: tax,
            });
        }

        match consumed {
            Some(limit) => previous_limit = limit,
            None => break,
        }
    }

    let net_amount = amount - total_tax;
    let effective_rate_percent = checked_mul("amount", total_tax / amount, Decimal::ONE_HUNDRED)?;

    debug!(
        %amount,
        %total_tax,
        %effective_rate_percent,
        bands = breakdown.len(),
        "progressive tax computed"
    );

    Ok(ProgressiveTaxResult {
        total_tax,
        net_amount,
        effective_rate_percent,
        breakdown,
    })
}

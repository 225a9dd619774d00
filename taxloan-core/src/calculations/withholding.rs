//! Withholding tax on rent, bank interest and dividends.
//!
//! | Kind          | Rate | Applies when        |
//! |---------------|------|---------------------|
//! | rent          | 10%  | amount > 100,000    |
//! | bank-interest | 5%   | always              |
//! | dividend      | 14%  | amount > 100,000    |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxloan_core::WithholdingKind;
//! use taxloan_core::calculations::compute_withholding;
//!
//! let result = compute_withholding(WithholdingKind::Rent, dec!(150000)).unwrap();
//!
//! assert_eq!(result.applied_rate_percent(), dec!(10));
//! assert_eq!(result.tax_amount(), dec!(15000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::WithholdingKind;
use crate::calculations::common::{percent_of, require_positive};
use crate::error::CalculationResult;

/// Outcome of a withholding calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WithholdingResult {
    Applicable {
        applied_rate_percent: Decimal,
        tax_amount: Decimal,
    },
    /// The amount is at or below the kind's threshold.
    NotApplicable,
}

impl WithholdingResult {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Applicable { .. })
    }

    pub fn applied_rate_percent(&self) -> Decimal {
        match self {
            Self::Applicable {
                applied_rate_percent,
                ..
            } => *applied_rate_percent,
            Self::NotApplicable => Decimal::ZERO,
        }
    }

    pub fn tax_amount(&self) -> Decimal {
        match self {
            Self::Applicable { tax_amount, .. } => *tax_amount,
            Self::NotApplicable => Decimal::ZERO,
        }
    }
}

/// Computes withholding tax for `amount` paid as `kind`.
///
/// # Errors
///
/// Returns `InvalidInput` if `amount` is not greater than zero.
pub fn compute_withholding(
    kind: WithholdingKind,
    amount: Decimal,
) -> CalculationResult<WithholdingResult> {
    let amount = require_positive("amount", amount)?;

    if let Some(threshold) = kind.threshold() {
        if amount <= threshold {
            debug!(%kind, %amount, %threshold, "withholding not applicable");
            return Ok(WithholdingResult::NotApplicable);
        }
    }

    let rate = kind.rate_percent();
    let tax = percent_of("amount", amount, rate)?;
    debug!(%kind, %amount, %rate, %tax, "withholding computed");

    Ok(WithholdingResult::Applicable {
        applied_rate_percent: rate,
        tax_amount: tax,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rent_above_threshold_taxed_at_ten_percent() {
        let result = compute_withholding(WithholdingKind::Rent, dec!(250000)).unwrap();

        assert_eq!(
            result,
            WithholdingResult::Applicable {
                applied_rate_percent: dec!(10),
                tax_amount: dec!(25000),
            }
        );
    }

    #[test]
    fn rent_at_threshold_not_applicable() {
        let result = compute_withholding(WithholdingKind::Rent, dec!(100000)).unwrap();

        assert_eq!(result, WithholdingResult::NotApplicable);
        assert_eq!(result.applied_rate_percent(), dec!(0));
        assert_eq!(result.tax_amount(), dec!(0));
    }

    #[test]
    fn rent_just_above_threshold_applies() {
        let result = compute_withholding(WithholdingKind::Rent, dec!(100000.01)).unwrap();

        assert!(result.is_applicable());
        assert_eq!(result.tax_amount(), dec!(10000.001));
    }

    #[test]
    fn dividend_above_threshold_taxed_at_fourteen_percent() {
        let result = compute_withholding(WithholdingKind::Dividend, dec!(200000)).unwrap();

        assert_eq!(result.applied_rate_percent(), dec!(14));
        assert_eq!(result.tax_amount(), dec!(28000));
    }

    #[test]
    fn dividend_below_threshold_not_applicable() {
        let result = compute_withholding(WithholdingKind::Dividend, dec!(99999)).unwrap();

        assert!(!result.is_applicable());
    }

    #[test]
    fn bank_interest_always_applies() {
        for amount in [dec!(1), dec!(100000), dec!(5000000)] {
            let result = compute_withholding(WithholdingKind::BankInterest, amount).unwrap();

            assert_eq!(result.applied_rate_percent(), dec!(5));
            assert_eq!(result.tax_amount(), amount * dec!(0.05));
        }
    }

    #[test]
    fn zero_amount_is_invalid() {
        let err = compute_withholding(WithholdingKind::BankInterest, dec!(0)).unwrap_err();

        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn negative_amount_is_invalid() {
        assert!(compute_withholding(WithholdingKind::Rent, dec!(-150000)).is_err());
    }
}

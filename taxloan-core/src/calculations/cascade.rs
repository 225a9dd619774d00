//! Sale tax and VAT cascade (SSCL).
//!
//! Sale tax is levied first; VAT is then levied on the amount *including*
//! sale tax, so the order of the two steps matters.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxloan_core::calculations::compute_cascade_tax;
//!
//! let result = compute_cascade_tax(dec!(100000)).unwrap();
//!
//! assert_eq!(result.sale_tax, dec!(2500));
//! assert_eq!(result.vat, dec!(15375));
//! assert_eq!(result.total_cascade_tax, dec!(17875));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{checked_add, percent_of, require_positive};
use crate::error::CalculationResult;

/// Sale tax rate in percent.
pub const SALE_TAX_RATE_PERCENT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);
/// VAT rate in percent.
pub const VAT_RATE_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeTaxResult {
    pub sale_tax: Decimal,
    pub after_sale_amount: Decimal,
    pub vat: Decimal,
    pub total_cascade_tax: Decimal,
}

/// Computes sale tax then VAT on the post-sale-tax amount.
///
/// # Errors
///
/// Returns `InvalidInput` if `amount` is not greater than zero.
pub fn compute_cascade_tax(amount: Decimal) -> CalculationResult<CascadeTaxResult> {
    let amount = require_positive("amount", amount)?;

    let sale_tax = percent_of("amount", amount, SALE_TAX_RATE_PERCENT)?;
    let after_sale_amount = checked_add("amount", amount, sale_tax)?;
    let vat = percent_of("amount", after_sale_amount, VAT_RATE_PERCENT)?;
    let total_cascade_tax = checked_add("amount", sale_tax, vat)?;

    debug!(%amount, %sale_tax, %vat, %total_cascade_tax, "cascade tax computed");

    Ok(CascadeTaxResult {
        sale_tax,
        after_sale_amount,
        vat,
        total_cascade_tax,
    })
}

//! Tax and loan calculators.
//!
//! Every calculator is a pure function: it validates its arguments, then
//! returns a freshly built result record. Nothing is cached or shared
//! between calls.

pub mod amortization;
pub mod cascade;
pub mod common;
pub mod progressive;
pub mod withholding;

pub use amortization::{
    AmortizationResult, MAX_YEARS, MIN_YEARS, ReverseAmortizationResult, compute_amortization,
    compute_max_principal,
};
pub use cascade::{CascadeTaxResult, compute_cascade_tax};
pub use progressive::{ProgressiveTaxResult, TaxBreakdownEntry, compute_progressive_tax};
pub use withholding::{WithholdingResult, compute_withholding};

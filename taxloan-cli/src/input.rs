//! Parsing of raw text fields into calculator arguments.
//!
//! The calculators only ever see numbers; everything a user can type wrong
//! is caught here first.

use rust_decimal::Decimal;
use taxloan_core::WithholdingKind;
use thiserror::Error;

/// Error returned when a text field cannot be turned into an argument.
#[derive(Debug, Error)]
pub enum ParseInputError {
    #[error("a value is required")]
    Empty,

    #[error("invalid number '{input}': {source}")]
    InvalidNumber {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("'{input}' is not a whole number of years")]
    InvalidYears { input: String },

    #[error("'{input}' is not one of rent, bank-interest, dividend")]
    InvalidKind { input: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses an amount or rate.
///
/// Handles comma as thousands separator (e.g. `"1,500,000"`). Empty input is
/// an error; range checks are left to the calculators.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseInputError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ParseInputError::Empty);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseInputError::InvalidNumber {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a loan term. Only whole numbers are accepted; `2.5` is rejected
/// rather than truncated.
pub fn parse_years(s: &str) -> Result<u32, ParseInputError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseInputError::Empty);
    }
    trimmed.parse().map_err(|_| {
        tracing::warn!(input = %s, "invalid loan term");
        ParseInputError::InvalidYears {
            input: s.to_string(),
        }
    })
}

pub fn parse_kind(s: &str) -> Result<WithholdingKind, ParseInputError> {
    if s.trim().is_empty() {
        return Err(ParseInputError::Empty);
    }
    WithholdingKind::parse(s).ok_or_else(|| ParseInputError::InvalidKind {
        input: s.to_string(),
    })
}

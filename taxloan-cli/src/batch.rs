//! CSV batch input: many calculator invocations in one file.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Cells are
//! trimmed. Columns a calculator does not use may be left empty or omitted.
//!
//! | Column       | Used by                          | Notes                                  |
//! |--------------|----------------------------------|----------------------------------------|
//! | `calculator` | all                              | `withholding`, `payroll`, `income`, `sscl`, `loan`, `max-loan` |
//! | `kind`       | `withholding`                    | `rent`, `bank-interest`, `dividend`    |
//! | `amount`     | all                              | principal for `loan`, installment for `max-loan` |
//! | `rate`       | `loan`, `max-loan`               | annual rate in percent                 |
//! | `years`      | `loan`, `max-loan`               | whole number, 1 to 5                   |
//!
//! ### Example
//!
//! ```csv
//! calculator,kind,amount,rate,years
//! withholding,rent,150000,,
//! income,,1500000,,
//! loan,,1000000,12,3
//! ```
//!
//! A structurally broken file fails as a whole. A row with a bad value is
//! kept as a failed row so the rest of the batch still runs.

use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use taxloan_core::CalculationError;
use thiserror::Error;
use tracing::{info, warn};

use crate::input::{ParseInputError, parse_amount, parse_kind, parse_years};
use crate::request::{CalculationOutcome, CalculationRequest, Calculator};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    calculator: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    rate: Option<String>,
    #[serde(default)]
    years: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The file could not be read as a batch at all.
#[derive(Debug, Error)]
pub enum BatchLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// A single row could not be turned into a result.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("unrecognised calculator '{0}'")]
    UnknownCalculator(String),

    #[error("column '{0}' is required")]
    MissingField(&'static str),

    #[error("column '{field}': {source}")]
    Input {
        field: &'static str,
        #[source]
        source: ParseInputError,
    },

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

// ---------------------------------------------------------------------------
// Loaded and evaluated rows
// ---------------------------------------------------------------------------

/// A row as loaded from the file. `row` is 1-based (header = row 0).
#[derive(Debug)]
pub struct BatchRow {
    pub row: usize,
    pub calculator: Option<Calculator>,
    pub request: Result<CalculationRequest, RowError>,
}

/// A row after its calculator ran.
#[derive(Debug)]
pub struct BatchResult {
    pub row: usize,
    pub calculator: Option<Calculator>,
    pub outcome: Result<CalculationOutcome, RowError>,
}

fn required(
    field: &'static str,
    value: Option<String>,
) -> Result<String, RowError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RowError::MissingField(field))
}

fn amount_field(
    field: &'static str,
    value: Option<String>,
) -> Result<Decimal, RowError> {
    parse_amount(&required(field, value)?).map_err(|source| RowError::Input { field, source })
}

fn years_field(value: Option<String>) -> Result<u32, RowError> {
    parse_years(&required("years", value)?).map_err(|source| RowError::Input {
        field: "years",
        source,
    })
}

fn convert_row(
    row: CsvRow,
    calculator: Calculator,
) -> Result<CalculationRequest, RowError> {
    let request = match calculator {
        Calculator::Withholding => CalculationRequest::Withholding {
            kind: parse_kind(&required("kind", row.kind)?).map_err(|source| RowError::Input {
                field: "kind",
                source,
            })?,
            amount: amount_field("amount", row.amount)?,
        },
        Calculator::Payroll => CalculationRequest::Payroll {
            salary: amount_field("amount", row.amount)?,
        },
        Calculator::Income => CalculationRequest::Income {
            income: amount_field("amount", row.amount)?,
        },
        Calculator::Sscl => CalculationRequest::Sscl {
            amount: amount_field("amount", row.amount)?,
        },
        Calculator::Loan => CalculationRequest::Loan {
            amount: amount_field("amount", row.amount)?,
            annual_rate_percent: amount_field("rate", row.rate)?,
            years: years_field(row.years)?,
        },
        Calculator::MaxLoan => CalculationRequest::MaxLoan {
            installment: amount_field("amount", row.amount)?,
            annual_rate_percent: amount_field("rate", row.rate)?,
            years: years_field(row.years)?,
        },
    };
    Ok(request)
}

/// Parse batch CSV text. Rows are returned in file order.
///
/// # Errors
///
/// [`BatchLoadError::Parse`] if the CSV is structurally invalid (missing
/// `calculator` header, ragged rows, bad encoding).
pub fn load_from_str(input: &str) -> Result<Vec<BatchRow>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1;
            let calculator = Calculator::parse(&row.calculator);
            let request = match calculator {
                Some(calculator) => convert_row(row, calculator),
                None => Err(RowError::UnknownCalculator(row.calculator)),
            };
            if let Err(err) = &request {
                warn!(row = row_number, %err, "batch row rejected");
            }
            Ok(BatchRow {
                row: row_number,
                calculator,
                request,
            })
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> anyhow::Result<Vec<BatchRow>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
    let rows = load_from_str(&contents)
        .with_context(|| format!("Failed to parse batch file: {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "batch loaded");
    Ok(rows)
}

/// Runs every loaded row independently.
pub fn run(rows: Vec<BatchRow>) -> Vec<BatchResult> {
    rows.into_iter()
        .map(|batch_row| {
            let outcome = batch_row
                .request
                .and_then(|request| request.run().map_err(RowError::from));
            if let Err(err) = &outcome {
                warn!(row = batch_row.row, %err, "batch row failed");
            }
            BatchResult {
                row: batch_row.row,
                calculator: batch_row.calculator,
                outcome,
            }
        })
        .collect()
}

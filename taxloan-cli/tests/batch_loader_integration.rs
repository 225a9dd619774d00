//! Integration tests that run the batch loader against an on-disk fixture
//! file, complementing the inline-string unit tests in batch.rs.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use taxloan_cli::batch::{self, RowError};
use taxloan_cli::render::{self, SummaryRecord};
use taxloan_cli::{CalculationOutcome, Calculator};
use taxloan_core::calculations::common::round_half_up;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_batch.csv")
        .leak()
}

#[test]
fn test_load_fixture_file_succeeds() {
    let rows = batch::load_from_file(fixture_path()).expect("fixture file should load");

    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|r| r.request.is_ok()));
}

#[test]
fn test_fixture_withholding_rows() {
    let results = batch::run(batch::load_from_file(fixture_path()).unwrap());

    let CalculationOutcome::Withholding { result: rent, .. } = results[0].outcome.as_ref().unwrap()
    else {
        panic!("row 1 should be withholding");
    };
    assert_eq!(rent.tax_amount(), dec!(15000));

    let CalculationOutcome::Withholding { result: dividend, .. } =
        results[1].outcome.as_ref().unwrap()
    else {
        panic!("row 2 should be withholding");
    };
    assert!(!dividend.is_applicable());

    let CalculationOutcome::Withholding { amount, result: bank, .. } =
        results[2].outcome.as_ref().unwrap()
    else {
        panic!("row 3 should be withholding");
    };
    assert_eq!(*amount, dec!(12500));
    assert_eq!(bank.tax_amount(), dec!(625));
}

#[test]
fn test_fixture_loan_rows() {
    let results = batch::run(batch::load_from_file(fixture_path()).unwrap());

    let CalculationOutcome::Loan { result, .. } = results[6].outcome.as_ref().unwrap() else {
        panic!("row 7 should be a loan");
    };
    assert_eq!(round_half_up(result.installment), dec!(33214.31));

    let CalculationOutcome::MaxLoan { result, .. } = results[7].outcome.as_ref().unwrap() else {
        panic!("row 8 should be a max loan");
    };
    assert_eq!(round_half_up(result.principal), dec!(752687.63));
}

#[test]
fn test_fixture_out_of_range_term_fails_only_its_row() {
    let results = batch::run(batch::load_from_file(fixture_path()).unwrap());

    let last = results.last().unwrap();
    assert_eq!(last.row, 9);
    assert_eq!(last.calculator, Some(Calculator::Loan));
    assert!(matches!(last.outcome, Err(RowError::Calculation(_))));
    assert_eq!(results.iter().filter(|r| r.outcome.is_ok()).count(), 8);
}

#[test]
fn test_fixture_csv_summary() {
    let results = batch::run(batch::load_from_file(fixture_path()).unwrap());
    let records: Vec<SummaryRecord> = results
        .iter()
        .map(|r| match &r.outcome {
            Ok(outcome) => SummaryRecord::from_outcome(r.row, outcome),
            Err(err) => SummaryRecord::from_error(r.row, r.calculator.map(|c| c.as_str()), err),
        })
        .collect();

    let mut buf = Vec::new();
    render::write_summary(&mut buf, &records).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 10);
    assert_eq!(
        lines[0],
        "row,calculator,status,headline,tax_or_interest,net_or_total,message"
    );
    assert_eq!(lines[5], "5,income,ok,1.20,18000.00,1482000.00,");
    assert_eq!(
        lines[9],
        "9,loan,error,,,,\"invalid years: must be between 1 and 5, got 6\""
    );
}

#[test]
fn test_load_nonexistent_file_returns_err() {
    let bad_path = Path::new("/this/path/does/not/exist.csv");

    assert!(batch::load_from_file(bad_path).is_err());
}

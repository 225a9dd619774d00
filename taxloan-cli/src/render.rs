//! Turns calculation outcomes into text panels or CSV summary rows.
//!
//! Amounts are shown with the fixed `Rs.` label and two decimals; bracket
//! ranges use thousands separators.

use std::fmt::{self, Write as _};
use std::io;

use rust_decimal::Decimal;
use serde::Serialize;
use taxloan_core::calculations::cascade::{SALE_TAX_RATE_PERCENT, VAT_RATE_PERCENT};
use taxloan_core::calculations::common::round_half_up;
use taxloan_core::calculations::{ProgressiveTaxResult, WithholdingResult};

use crate::request::CalculationOutcome;

pub const CURRENCY: &str = "Rs.";

const NOT_APPLICABLE: &str = "No withholding tax applicable for the selected option and amount.";

/// `Rs. 1234.50`
pub fn money(value: Decimal) -> String {
    format!("{CURRENCY} {:.2}", round_half_up(value))
}

/// Writes `value` with `,` between each group of three integer digits.
pub fn grouped(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// User-facing warning for a rejected calculation.
pub fn warning(err: &dyn fmt::Display) -> String {
    format!("⚠️ {err}")
}

/// Renders an outcome as the multi-line text panel shown to the user.
pub fn render_text(outcome: &CalculationOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_panel(&mut out, outcome);
    out
}

fn write_panel(
    out: &mut String,
    outcome: &CalculationOutcome,
) -> fmt::Result {
    match outcome {
        CalculationOutcome::Withholding {
            kind,
            amount,
            result,
        } => match result {
            WithholdingResult::Applicable {
                applied_rate_percent,
                tax_amount,
            } => {
                writeln!(out, "Type: {}", kind.label())?;
                writeln!(out, "Amount: {}", money(*amount))?;
                writeln!(out, "Applied Rate: {applied_rate_percent}%")?;
                writeln!(out, "Tax Amount: {}", money(*tax_amount))
            }
            WithholdingResult::NotApplicable => writeln!(out, "{NOT_APPLICABLE}"),
        },
        CalculationOutcome::Payroll { salary, result } => {
            writeln!(out, "Tax Amount: {}", money(result.total_tax))?;
            writeln!(out, "Net Salary: {}", money(result.net_amount))?;
            write_progressive_tail(out, *salary, result)
        }
        CalculationOutcome::Income { income, result } => {
            writeln!(out, "Total Tax: {}", money(result.total_tax))?;
            writeln!(out, "Net Income: {}", money(result.net_amount))?;
            write_progressive_tail(out, *income, result)
        }
        CalculationOutcome::Sscl { result, .. } => {
            writeln!(out, "Sale Tax ({SALE_TAX_RATE_PERCENT}%): {}", money(result.sale_tax))?;
            writeln!(out, "After Sale Amount: {}", money(result.after_sale_amount))?;
            writeln!(out, "VAT ({VAT_RATE_PERCENT}% on after sale): {}", money(result.vat))?;
            writeln!(out, "Total SSCL: {}", money(result.total_cascade_tax))
        }
        CalculationOutcome::Loan {
            amount,
            annual_rate_percent,
            years,
            result,
        } => {
            writeln!(out, "Loan Amount: {}", money(*amount))?;
            write_term(out, *years, *annual_rate_percent)?;
            writeln!(out, "Monthly EMI: {}", money(result.installment))?;
            writeln!(out, "Total Payment: {}", money(result.total_payment))?;
            writeln!(out, "Total Interest: {}", money(result.total_interest))
        }
        CalculationOutcome::MaxLoan {
            installment,
            annual_rate_percent,
            years,
            result,
        } => {
            writeln!(out, "Calculated Max Loan (principal): {}", money(result.principal))?;
            write_term(out, *years, *annual_rate_percent)?;
            writeln!(out, "Assumed Monthly EMI: {}", money(*installment))?;
            writeln!(out, "Total Payment: {}", money(result.total_payment))?;
            writeln!(out, "Total Interest: {}", money(result.total_interest))
        }
    }
}

fn write_term(
    out: &mut String,
    years: u32,
    annual_rate_percent: Decimal,
) -> fmt::Result {
    writeln!(out, "Years: {years} ({} months)", years * 12)?;
    writeln!(out, "Annual Rate: {:.2}%", round_half_up(annual_rate_percent))
}

fn write_progressive_tail(
    out: &mut String,
    amount: Decimal,
    result: &ProgressiveTaxResult,
) -> fmt::Result {
    writeln!(
        out,
        "Effective Rate: {:.2}%",
        round_half_up(result.effective_rate_percent)
    )?;
    tracing::trace!(%amount, rows = result.breakdown.len(), "rendering breakdown");

    let header = ["Range (Rs.)", "Rate", "Taxable", "Tax"];
    let rows: Vec<[String; 4]> = result
        .breakdown
        .iter()
        .map(|entry| {
            [
                format!("{} - {}", grouped(entry.lower_bound), grouped(entry.upper_bound)),
                format!("{}%", entry.rate_percent),
                money(entry.taxable_amount),
                money(entry.tax_amount),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(out)?;
    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, rule.as_slice(), &widths)?;
    for row in &rows {
        write_row(out, row.as_slice(), &widths)?;
    }
    Ok(())
}

fn write_row<S: AsRef<str>>(
    out: &mut String,
    cells: &[S],
    widths: &[usize; 4],
) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(out, "{}", line.trim_end())
}

// ---------------------------------------------------------------------------
// CSV summary
// ---------------------------------------------------------------------------

/// Column names of the CSV summary, in write order.
pub const SUMMARY_HEADERS: [&str; 7] = [
    "row",
    "calculator",
    "status",
    "headline",
    "tax_or_interest",
    "net_or_total",
    "message",
];

/// One line of the CSV summary. Figures that do not apply are left empty.
///
/// | Calculator          | `headline`           | `tax_or_interest` | `net_or_total`   |
/// |---------------------|----------------------|-------------------|------------------|
/// | withholding         | applied rate %       | tax               | amount after tax |
/// | payroll, income     | effective rate %     | total tax         | net amount       |
/// | sscl                | total SSCL           | total SSCL        | amount plus SSCL |
/// | loan                | monthly installment  | total interest    | total payment    |
/// | max-loan            | principal            | total interest    | total payment    |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub row: usize,
    pub calculator: String,
    pub status: &'static str,
    pub headline: Option<Decimal>,
    pub tax_or_interest: Option<Decimal>,
    pub net_or_total: Option<Decimal>,
    pub message: String,
}

impl SummaryRecord {
    pub fn from_outcome(
        row: usize,
        outcome: &CalculationOutcome,
    ) -> Self {
        let r = |v: Decimal| Some(round_half_up(v));
        let base = Self {
            row,
            calculator: outcome.calculator().to_string(),
            status: "ok",
            ..Default::default()
        };

        match outcome {
            CalculationOutcome::Withholding { amount, result, .. } => match result {
                WithholdingResult::Applicable {
                    applied_rate_percent,
                    tax_amount,
                } => Self {
                    headline: Some(*applied_rate_percent),
                    tax_or_interest: r(*tax_amount),
                    net_or_total: r(*amount - *tax_amount),
                    ..base
                },
                WithholdingResult::NotApplicable => Self {
                    net_or_total: r(*amount),
                    message: "not applicable".to_string(),
                    ..base
                },
            },
            CalculationOutcome::Payroll { result, .. } | CalculationOutcome::Income { result, .. } => {
                Self {
                    headline: r(result.effective_rate_percent),
                    tax_or_interest: r(result.total_tax),
                    net_or_total: r(result.net_amount),
                    ..base
                }
            }
            CalculationOutcome::Sscl { amount, result } => Self {
                headline: r(result.total_cascade_tax),
                tax_or_interest: r(result.total_cascade_tax),
                net_or_total: r(*amount + result.total_cascade_tax),
                ..base
            },
            CalculationOutcome::Loan { result, .. } => Self {
                headline: r(result.installment),
                tax_or_interest: r(result.total_interest),
                net_or_total: r(result.total_payment),
                ..base
            },
            CalculationOutcome::MaxLoan { result, .. } => Self {
                headline: r(result.principal),
                tax_or_interest: r(result.total_interest),
                net_or_total: r(result.total_payment),
                ..base
            },
        }
    }

    pub fn from_error(
        row: usize,
        calculator: Option<&str>,
        err: &dyn fmt::Display,
    ) -> Self {
        Self {
            row,
            calculator: calculator.unwrap_or_default().to_string(),
            status: "error",
            message: err.to_string(),
            ..Default::default()
        }
    }
}

/// Writes the header line, then one line per record. An empty slice still
/// produces the header.
pub fn write_summary<W: io::Write>(
    writer: W,
    records: &[SummaryRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(SUMMARY_HEADERS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use taxloan_core::WithholdingKind;

    use super::*;
    use crate::request::CalculationRequest;

    fn run(request: CalculationRequest) -> CalculationOutcome {
        request.run().unwrap()
    }

    // =========================================================================
    // formatting helpers
    // =========================================================================

    #[test]
    fn money_pads_to_two_decimals() {
        assert_eq!(money(dec!(2500)), "Rs. 2500.00");
        assert_eq!(money(dec!(33214.309812)), "Rs. 33214.31");
    }

    #[test]
    fn grouped_inserts_thousands_separators() {
        assert_eq!(grouped(dec!(1)), "1");
        assert_eq!(grouped(dec!(100000)), "100,000");
        assert_eq!(grouped(dec!(1200001)), "1,200,001");
        assert_eq!(grouped(dec!(100000.50)), "100,000.5");
        assert_eq!(grouped(dec!(-1234)), "-1,234");
    }

    // =========================================================================
    // text panels
    // =========================================================================

    #[test]
    fn withholding_panel_shows_rate_and_tax() {
        let text = render_text(&run(CalculationRequest::Withholding {
            kind: WithholdingKind::Dividend,
            amount: dec!(200000),
        }));

        assert_eq!(
            text,
            "Type: Dividend\nAmount: Rs. 200000.00\nApplied Rate: 14%\nTax Amount: Rs. 28000.00\n"
        );
    }

    #[test]
    fn withholding_panel_not_applicable() {
        let text = render_text(&run(CalculationRequest::Withholding {
            kind: WithholdingKind::Rent,
            amount: dec!(50000),
        }));

        assert_eq!(text, format!("{NOT_APPLICABLE}\n"));
    }

    #[test]
    fn income_panel_includes_breakdown_table() {
        let text = render_text(&run(CalculationRequest::Income {
            income: dec!(1500000),
        }));

        let expected = "\
Total Tax: Rs. 18000.00
Net Income: Rs. 1482000.00
Effective Rate: 1.20%

Range (Rs.)           | Rate | Taxable        | Tax
--------------------- | ---- | -------------- | ------------
1 - 1,200,000         | 0%   | Rs. 1200000.00 | Rs. 0.00
1,200,001 - 1,500,000 | 6%   | Rs. 300000.00  | Rs. 18000.00
";
        assert_eq!(text, expected);
    }

    #[test]
    fn sscl_panel_lists_each_step() {
        let text = render_text(&run(CalculationRequest::Sscl {
            amount: dec!(100000),
        }));

        assert_eq!(
            text,
            "Sale Tax (2.5%): Rs. 2500.00\n\
             After Sale Amount: Rs. 102500.00\n\
             VAT (15% on after sale): Rs. 15375.00\n\
             Total SSCL: Rs. 17875.00\n"
        );
    }

    #[test]
    fn loan_panel_shows_term_and_installment() {
        let text = render_text(&run(CalculationRequest::Loan {
            amount: dec!(1000000),
            annual_rate_percent: dec!(12),
            years: 3,
        }));

        assert!(text.contains("Years: 3 (36 months)\n"));
        assert!(text.contains("Annual Rate: 12.00%\n"));
        assert!(text.contains("Monthly EMI: Rs. 33214.31\n"));
        assert!(text.contains("Total Interest: Rs. 195715.15\n"));
    }

    #[test]
    fn max_loan_panel_shows_principal() {
        let text = render_text(&run(CalculationRequest::MaxLoan {
            installment: dec!(25000),
            annual_rate_percent: dec!(12),
            years: 3,
        }));

        assert!(text.starts_with("Calculated Max Loan (principal): Rs. 752687.63\n"));
        assert!(text.contains("Assumed Monthly EMI: Rs. 25000.00\n"));
    }

    #[test]
    fn warning_prefixes_message() {
        assert_eq!(warning(&"invalid amount"), "⚠️ invalid amount");
    }

    // =========================================================================
    // CSV summary
    // =========================================================================

    #[test]
    fn summary_csv_writes_header_and_empty_cells() {
        let records = vec![
            SummaryRecord::from_outcome(
                1,
                &run(CalculationRequest::Sscl {
                    amount: dec!(100000),
                }),
            ),
            SummaryRecord::from_error(2, Some("loan"), &"invalid years"),
        ];

        let mut buf = Vec::new();
        write_summary(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected = "\
row,calculator,status,headline,tax_or_interest,net_or_total,message
1,sscl,ok,17875.00,17875.00,117875.00,
2,loan,error,,,,invalid years
";
        assert_eq!(text, expected);
    }

    #[test]
    fn summary_for_progressive_outcome_rounds_values() {
        let record = SummaryRecord::from_outcome(
            3,
            &run(CalculationRequest::Payroll {
                salary: dec!(200000),
            }),
        );

        assert_eq!(record.headline, Some(dec!(5.25)));
        assert_eq!(record.tax_or_interest, Some(dec!(10500.00)));
        assert_eq!(record.net_or_total, Some(dec!(189500.00)));
    }

    #[test]
    fn summary_header_matches_documented_columns() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &[SummaryRecord::from_error(1, Some("loan"), &"x")]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text.lines().next(),
            Some("row,calculator,status,headline,tax_or_interest,net_or_total,message")
        );
        assert_eq!(text.lines().nth(1), Some("1,loan,error,,,,x"));
    }

    #[test]
    fn summary_csv_without_records_still_writes_header() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &[]).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", SUMMARY_HEADERS.join(",")));
    }

    #[test]
    fn summary_for_loan_and_withholding_outcomes() {
        let loan = SummaryRecord::from_outcome(
            1,
            &run(CalculationRequest::Loan {
                amount: dec!(1000000),
                annual_rate_percent: dec!(12),
                years: 3,
            }),
        );
        assert_eq!(loan.headline, Some(dec!(33214.31)));
        assert_eq!(loan.tax_or_interest, Some(dec!(195715.15)));
        assert_eq!(loan.net_or_total, Some(dec!(1195715.15)));

        let rent = SummaryRecord::from_outcome(
            2,
            &run(CalculationRequest::Withholding {
                kind: WithholdingKind::Rent,
                amount: dec!(150000),
            }),
        );
        assert_eq!(rent.headline, Some(dec!(10)));
        assert_eq!(rent.tax_or_interest, Some(dec!(15000.00)));
        assert_eq!(rent.net_or_total, Some(dec!(135000.00)));

        let exempt = SummaryRecord::from_outcome(
            3,
            &run(CalculationRequest::Withholding {
                kind: WithholdingKind::Dividend,
                amount: dec!(80000),
            }),
        );
        assert_eq!(exempt.headline, None);
        assert_eq!(exempt.net_or_total, Some(dec!(80000.00)));
        assert_eq!(exempt.message, "not applicable");
    }
}

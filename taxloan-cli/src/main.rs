use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use taxloan_cli::batch::{self, BatchResult};
use taxloan_cli::input::{parse_amount, parse_kind, parse_years};
use taxloan_cli::render::{self, SummaryRecord};
use taxloan_cli::{CalculationRequest, logging};
use taxloan_core::WithholdingKind;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Withholding, payroll, income, SSCL and loan calculators.
///
/// Amounts accept `,` as a thousands separator. Results go to stdout,
/// warnings and logs to stderr.
#[derive(Debug, Parser)]
#[command(name = "taxloan", version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `warn,taxloan_core=trace`.
    /// Falls back to `RUST_LOG`, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// How results are written.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Labelled panels with a breakdown table.
    Text,
    /// One summary line per calculation.
    Csv,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Withholding tax on rent, bank interest or dividends.
    Withholding {
        /// rent, bank-interest or dividend.
        #[arg(long, value_parser = parse_kind)]
        kind: WithholdingKind,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,
    },

    /// Monthly payroll tax on a salary.
    Payroll {
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        salary: Decimal,
    },

    /// Annual income tax.
    Income {
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        income: Decimal,
    },

    /// Sale tax followed by VAT on the taxed amount.
    Sscl {
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,
    },

    /// Monthly installment for a loan.
    Loan {
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,

        /// Annual interest rate in percent.
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        rate: Decimal,

        /// Loan term, 1 to 5 years.
        #[arg(long, value_parser = parse_years)]
        years: u32,
    },

    /// Largest loan a monthly installment can repay.
    MaxLoan {
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        installment: Decimal,

        /// Annual interest rate in percent.
        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        rate: Decimal,

        /// Loan term, 1 to 5 years.
        #[arg(long, value_parser = parse_years)]
        years: u32,
    },

    /// Run every calculation listed in a CSV file.
    Batch {
        /// Path to the CSV file (columns: calculator, kind, amount, rate, years).
        #[arg(short, long)]
        file: PathBuf,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let request = match cli.command {
        Command::Batch { file } => return run_batch(&file, cli.format),
        Command::Withholding { kind, amount } => CalculationRequest::Withholding { kind, amount },
        Command::Payroll { salary } => CalculationRequest::Payroll { salary },
        Command::Income { income } => CalculationRequest::Income { income },
        Command::Sscl { amount } => CalculationRequest::Sscl { amount },
        Command::Loan {
            amount,
            rate,
            years,
        } => CalculationRequest::Loan {
            amount,
            annual_rate_percent: rate,
            years,
        },
        Command::MaxLoan {
            installment,
            rate,
            years,
        } => CalculationRequest::MaxLoan {
            installment,
            annual_rate_percent: rate,
            years,
        },
    };

    run_single(&request, cli.format)
}

fn run_single(
    request: &CalculationRequest,
    format: OutputFormat,
) -> Result<ExitCode> {
    debug!(?request, "single calculation");

    let calculator = request.calculator();
    let (record, code) = match request.run() {
        Ok(outcome) => {
            if format == OutputFormat::Text {
                print!("{}", render::render_text(&outcome));
            }
            (SummaryRecord::from_outcome(1, &outcome), ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(%calculator, %err, "calculation rejected");
            eprintln!("{}", render::warning(&err));
            (
                SummaryRecord::from_error(1, Some(calculator.as_str()), &err),
                ExitCode::FAILURE,
            )
        }
    };

    if format == OutputFormat::Csv {
        render::write_summary(io::stdout().lock(), &[record])
            .context("Failed to write CSV summary")?;
    }
    Ok(code)
}

fn run_batch(
    file: &Path,
    format: OutputFormat,
) -> Result<ExitCode> {
    let rows = batch::load_from_file(file)?;
    let results = batch::run(rows);
    let failed = results.iter().filter(|r| r.outcome.is_err()).count();

    match format {
        OutputFormat::Text => print_batch_text(&results),
        OutputFormat::Csv => {
            let records: Vec<SummaryRecord> = results.iter().map(summary_for).collect();
            render::write_summary(io::stdout().lock(), &records)
                .context("Failed to write CSV summary")?;
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} rows failed", results.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_batch_text(results: &[BatchResult]) {
    for (idx, result) in results.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        let name = result.calculator.map(|c| c.as_str()).unwrap_or("unknown");
        println!("Row {} ({name})", result.row);
        match &result.outcome {
            Ok(outcome) => print!("{}", render::render_text(outcome)),
            Err(err) => println!("{}", render::warning(err)),
        }
    }
}

fn summary_for(result: &BatchResult) -> SummaryRecord {
    match &result.outcome {
        Ok(outcome) => SummaryRecord::from_outcome(result.row, outcome),
        Err(err) => {
            SummaryRecord::from_error(result.row, result.calculator.map(|c| c.as_str()), err)
        }
    }
}

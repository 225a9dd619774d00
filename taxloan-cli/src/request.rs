//! Parsed calculator invocations and their outcomes.

use std::fmt;

use rust_decimal::Decimal;
use taxloan_core::calculations::{
    AmortizationResult, CascadeTaxResult, ProgressiveTaxResult, ReverseAmortizationResult,
    WithholdingResult, compute_amortization, compute_cascade_tax, compute_max_principal,
    compute_progressive_tax, compute_withholding,
};
use taxloan_core::{BracketTable, CalculationResult, WithholdingKind};
use tracing::debug;

/// The calculators a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Withholding,
    Payroll,
    Income,
    Sscl,
    Loan,
    MaxLoan,
}

impl Calculator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Withholding => "withholding",
            Self::Payroll => "payroll",
            Self::Income => "income",
            Self::Sscl => "sscl",
            Self::Loan => "loan",
            Self::MaxLoan => "max-loan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "withholding" => Some(Self::Withholding),
            "payroll" | "payable" => Some(Self::Payroll),
            "income" => Some(Self::Income),
            "sscl" => Some(Self::Sscl),
            "loan" | "leasing" => Some(Self::Loan),
            "max-loan" => Some(Self::MaxLoan),
            _ => None,
        }
    }
}

impl fmt::Display for Calculator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calculator invocation with already-parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationRequest {
    Withholding {
        kind: WithholdingKind,
        amount: Decimal,
    },
    Payroll {
        salary: Decimal,
    },
    Income {
        income: Decimal,
    },
    Sscl {
        amount: Decimal,
    },
    Loan {
        amount: Decimal,
        annual_rate_percent: Decimal,
        years: u32,
    },
    MaxLoan {
        installment: Decimal,
        annual_rate_percent: Decimal,
        years: u32,
    },
}

/// A request together with the result it produced, kept side by side so a
/// renderer can echo the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationOutcome {
    Withholding {
        kind: WithholdingKind,
        amount: Decimal,
        result: WithholdingResult,
    },
    Payroll {
        salary: Decimal,
        result: ProgressiveTaxResult,
    },
    Income {
        income: Decimal,
        result: ProgressiveTaxResult,
    },
    Sscl {
        amount: Decimal,
        result: CascadeTaxResult,
    },
    Loan {
        amount: Decimal,
        annual_rate_percent: Decimal,
        years: u32,
        result: AmortizationResult,
    },
    MaxLoan {
        installment: Decimal,
        annual_rate_percent: Decimal,
        years: u32,
        result: ReverseAmortizationResult,
    },
}

impl CalculationRequest {
    pub fn calculator(&self) -> Calculator {
        match self {
            Self::Withholding { .. } => Calculator::Withholding,
            Self::Payroll { .. } => Calculator::Payroll,
            Self::Income { .. } => Calculator::Income,
            Self::Sscl { .. } => Calculator::Sscl,
            Self::Loan { .. } => Calculator::Loan,
            Self::MaxLoan { .. } => Calculator::MaxLoan,
        }
    }

    /// Runs the calculator this request names.
    pub fn run(&self) -> CalculationResult<CalculationOutcome> {
        debug!(calculator = %self.calculator(), "running calculation");

        let outcome = match *self {
            Self::Withholding { kind, amount } => CalculationOutcome::Withholding {
                kind,
                amount,
                result: compute_withholding(kind, amount)?,
            },
            Self::Payroll { salary } => CalculationOutcome::Payroll {
                salary,
                result: compute_progressive_tax(salary, &BracketTable::payroll())?,
            },
            Self::Income { income } => CalculationOutcome::Income {
                income,
                result: compute_progressive_tax(income, &BracketTable::annual_income())?,
            },
            Self::Sscl { amount } => CalculationOutcome::Sscl {
                amount,
                result: compute_cascade_tax(amount)?,
            },
            Self::Loan {
                amount,
                annual_rate_percent,
                years,
            } => CalculationOutcome::Loan {
                amount,
                annual_rate_percent,
                years,
                result: compute_amortization(amount, annual_rate_percent, years)?,
            },
            Self::MaxLoan {
                installment,
                annual_rate_percent,
                years,
            } => CalculationOutcome::MaxLoan {
                installment,
                annual_rate_percent,
                years,
                result: compute_max_principal(installment, annual_rate_percent, years)?,
            },
        };

        Ok(outcome)
    }
}

impl CalculationOutcome {
    pub fn calculator(&self) -> Calculator {
        match self {
            Self::Withholding { .. } => Calculator::Withholding,
            Self::Payroll { .. } => Calculator::Payroll,
            Self::Income { .. } => Calculator::Income,
            Self::Sscl { .. } => Calculator::Sscl,
            Self::Loan { .. } => Calculator::Loan,
            Self::MaxLoan { .. } => Calculator::MaxLoan,
        }
    }
}

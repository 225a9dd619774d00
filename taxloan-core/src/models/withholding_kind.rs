use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Payment types that carry withholding tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithholdingKind {
    Rent,
    BankInterest,
    Dividend,
}

impl WithholdingKind {
    pub fn all() -> &'static [WithholdingKind] {
        &[Self::Rent, Self::BankInterest, Self::Dividend]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::BankInterest => "bank-interest",
            Self::Dividend => "dividend",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::BankInterest => "Bank Interest",
            Self::Dividend => "Dividend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rent" => Some(Self::Rent),
            "bank-interest" | "bank" => Some(Self::BankInterest),
            "dividend" => Some(Self::Dividend),
            _ => None,
        }
    }

    /// Flat rate in percent.
    pub fn rate_percent(&self) -> Decimal {
        match self {
            Self::Rent => Decimal::from(10),
            Self::BankInterest => Decimal::from(5),
            Self::Dividend => Decimal::from(14),
        }
    }

    /// Amount the payment must exceed before tax applies; `None` means
    /// the rate always applies.
    pub fn threshold(&self) -> Option<Decimal> {
        match self {
            Self::Rent | Self::Dividend => Some(Decimal::from(100_000)),
            Self::BankInterest => None,
        }
    }
}

impl fmt::Display for WithholdingKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithholdingKind {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            CalculationError::invalid_input(
                "withholding kind",
                format!("'{s}' is not one of rent, bank-interest, dividend"),
            )
        })
    }
}

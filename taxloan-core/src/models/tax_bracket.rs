use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, CalculationResult};

/// One band of a progressive scheme: everything up to `upper_limit` (after
/// the previous band's limit) is taxed at `rate_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRow {
    /// `None` marks the open-ended top band.
    pub upper_limit: Option<Decimal>,
    pub rate_percent: Decimal,
}

impl BracketRow {
    pub const fn bounded(
        upper_limit: Decimal,
        rate_percent: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate_percent,
        }
    }

    pub const fn unbounded(rate_percent: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate_percent,
        }
    }
}

/// An ordered, validated set of bands.
///
/// Invariants, checked by [`BracketTable::new`]:
/// - at least one row
/// - limits strictly increasing, only the last row unbounded
/// - limits and rates non-negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    rows: Vec<BracketRow>,
}

// Rate ladder shared by the payroll and annual income schedules.
const RATES: [i64; 7] = [0, 6, 12, 18, 24, 30, 36];

impl BracketTable {
    pub fn new(rows: Vec<BracketRow>) -> CalculationResult<Self> {
        let Some(last) = rows.last() else {
            return Err(CalculationError::invalid_input(
                "bracket table",
                "must contain at least one row",
            ));
        };
        if last.upper_limit.is_some() {
            return Err(CalculationError::invalid_input(
                "bracket table",
                "last row must be unbounded",
            ));
        }

        let mut previous = Decimal::ZERO;
        for (idx, row) in rows.iter().enumerate() {
            if row.rate_percent.is_sign_negative() {
                return Err(CalculationError::invalid_input(
                    "bracket table",
                    format!("row {} has negative rate {}", idx + 1, row.rate_percent),
                ));
            }
            let Some(limit) = row.upper_limit else {
                if idx + 1 != rows.len() {
                    return Err(CalculationError::invalid_input(
                        "bracket table",
                        format!("row {} is unbounded but is not the last row", idx + 1),
                    ));
                }
                continue;
            };
            if limit.is_sign_negative() || (idx > 0 && limit <= previous) {
                return Err(CalculationError::invalid_input(
                    "bracket table",
                    format!(
                        "row {} limit {} must be non-negative and above {}",
                        idx + 1,
                        limit,
                        previous
                    ),
                ));
            }
            previous = limit;
        }

        Ok(Self { rows })
    }

    /// Monthly payroll (PAYE) schedule.
    pub fn payroll() -> Self {
        Self::ladder([100_000, 141_667, 183_333, 225_000, 266_667, 308_333])
    }

    /// Annual income tax schedule.
    pub fn annual_income() -> Self {
        Self::ladder([
            1_200_000, 1_700_000, 2_200_000, 2_700_000, 3_200_000, 3_700_000,
        ])
    }

    fn ladder(limits: [i64; 6]) -> Self {
        let mut rows: Vec<BracketRow> = limits
            .iter()
            .zip(RATES)
            .map(|(&limit, rate)| BracketRow::bounded(Decimal::from(limit), Decimal::from(rate)))
            .collect();
        rows.push(BracketRow::unbounded(Decimal::from(RATES[6])));
        Self { rows }
    }

    pub fn rows(&self) -> &[BracketRow] {
        &self.rows
    }
}

use thiserror::Error;

/// Errors raised by the calculators.
///
/// Every calculator validates its arguments before doing any arithmetic, so
/// an error never comes with a partial result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// An argument is outside the range the calculator accepts.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CalculationError {
    pub fn invalid_input(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending argument.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}

pub type CalculationResult<T> = Result<T, CalculationError>;

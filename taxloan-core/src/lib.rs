pub mod calculations;
pub mod error;
pub mod models;

pub use error::{CalculationError, CalculationResult};
pub use models::*;

pub mod batch;
pub mod input;
pub mod logging;
pub mod render;
pub mod request;

pub use request::{CalculationOutcome, CalculationRequest, Calculator};

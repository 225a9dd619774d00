mod tax_bracket;
mod withholding_kind;

pub use tax_bracket::{BracketRow, BracketTable};
pub use withholding_kind::WithholdingKind;

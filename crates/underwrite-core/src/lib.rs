pub mod error;
pub mod time_value;
pub mod types;
pub mod underwriting;

pub use error::UnderwriteError;
pub use types::*;
pub use underwriting::{
    amortization_schedule, analyze_deal, underwrite, underwrite_batch, validate_deal,
    AmortizationRow, DealAnalysis, DealInput, DealMetrics,
};

/// Standard result type for all underwriting operations
pub type UnderwriteResult<T> = Result<T, UnderwriteError>;

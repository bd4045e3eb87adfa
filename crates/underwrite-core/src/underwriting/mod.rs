pub mod analysis;
pub mod batch;
pub mod deal;
pub mod schedule;

pub use analysis::{analyze_deal, DealAnalysis};
pub use batch::underwrite_batch;
pub use deal::{underwrite, validate_deal, DealInput, DealMetrics};
pub use schedule::{amortization_schedule, AmortizationRow};

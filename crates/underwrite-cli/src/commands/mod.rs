pub mod batch;
pub mod deal;

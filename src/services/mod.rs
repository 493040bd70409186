//! Service layer: the harvest pass and the hourly scheduler that drives it.

pub mod harvest;
pub mod scheduler;

pub use harvest::HarvestJob;

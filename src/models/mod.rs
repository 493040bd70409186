//! Data models for matchvault.

mod player;
mod record;
mod report;
mod window;

pub use player::{Group, Player};
pub use record::{MatchId, MatchRecord};
pub use report::{PassSummary, PlayerReport};
pub use window::{lookback_windows, HarvestWindow};

//! matchvault - match-history harvesting and caching.
//!
//! Periodically walks back 30 days of match history for every tracked
//! player, through a rate-limited provider API, and persists newly-seen
//! match records into a durable document store.

pub mod cli;
pub mod config;
pub mod models;
pub mod provider;
pub mod repository;
pub mod services;

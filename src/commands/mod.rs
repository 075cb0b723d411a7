//! CLI command implementations for netshow.
//!
//! This module provides implementations for all CLI subcommands:
//! - `interfaces`: Interface roles, state and speed
//! - `counters`: Hardware port counters
//! - `asic`: Detected ASIC and port mapping
//! - `stp`: Spanning tree state of a bridge
//! - `check`: Data source availability
//! - `config`: Default configuration output

pub mod asic;
pub mod check;
pub mod config;
pub mod counters;
pub mod interfaces;
pub mod stp;

// Re-export command functions
pub use asic::command_asic;
pub use check::command_check;
pub use config::command_config;
pub use counters::command_counters;
pub use interfaces::command_interfaces;
pub use stp::command_stp;

/// Renders an optional value, blank when unknown.
pub(crate) fn blank<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

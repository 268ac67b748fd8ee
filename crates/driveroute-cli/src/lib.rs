//! Driveroute CLI library.
//!
//! Command handlers, output formatting and terminal styling for the
//! `driveroute-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;

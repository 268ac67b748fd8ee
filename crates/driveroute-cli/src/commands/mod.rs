// Each module handles one CLI subcommand; main.rs only parses and dispatches.

pub mod polyline;
pub mod route;
pub mod suggest;

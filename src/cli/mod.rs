//! Command-line interface
//!
//! - `args` - clap argument structures
//! - `router` - dispatch to command implementations

pub mod args;
pub mod router;

pub use args::{Cli, Commands};
pub use router::execute_command;

//! CLI module
//!
//! This module provides the CLI argument definitions:
//! - `args` - top-level `Cli` and `Commands`
//! - `runs_args` - `runs` subcommands

pub mod args;
pub mod runs_args;

pub use args::{Cli, Commands};
pub use runs_args::RunsCommands;

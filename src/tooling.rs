//! Tooling & Integration Layer
//!
//! Command-line access to the menu system.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};

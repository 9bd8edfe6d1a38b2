//! Command-line interface for forkbench
//!
//! Argument parsing lives in [`commands`]; every subcommand loads the layered
//! configuration, applies the global flags on top, and runs one benchmark.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;

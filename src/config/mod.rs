//! Configuration management for forkbench
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Defaults embedded from `default-config.toml`
//! 2. `~/.config/forkbench/config.toml`
//! 3. `./forkbench.toml`
//! 4. `FORKBENCH_*` environment variables, `__` separating sections
//!    (`FORKBENCH_RUNTIME__STRATEGY=sequential`)
//!
//! A `--config FILE` given on the command line replaces layers 2 and 3.
//! Command-line flags are applied on top by the CLI.

pub mod core;

pub use core::{BenchConfig, ProblemConfig, RuntimeConfig, SortConfig};

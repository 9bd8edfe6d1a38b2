//! # forkbench - Fork-join parallel benchmarks
//!
//! A structured fork-join runtime and three classic divide-and-conquer
//! benchmarks written against it.
//!
//! ## Features
//!
//! - **Structured spawn/join**: every child is joined before its frame ends
//! - **Pluggable executors**: sequential, rayon work-stealing, or scoped threads
//! - **Serial equivalence**: results never depend on how tasks were scheduled
//! - **Layered configuration**: embedded defaults, files, and `FORKBENCH_*` variables
//!
//! ## Quick Start
//!
//! ```bash
//! forkbench fib 30
//! forkbench --strategy threads -j 4 nqueens 10
//! forkbench qsort --timed --trials 3
//! ```

pub mod algorithms;
pub mod cli;
pub mod config;
pub mod parallel;
pub mod timer;

pub use cli::{Cli, Output};
pub use config::BenchConfig;
pub use parallel::{ExecutionStrategy, Runtime};


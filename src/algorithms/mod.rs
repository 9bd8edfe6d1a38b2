//! Divide-and-conquer algorithms written against the fork-join [`Runtime`]
//!
//! Each algorithm decomposes into a tree of frames: a frame spawns its children,
//! joins, and only then combines their results. The output never depends on
//! the [`ExecutionStrategy`] the runtime was built with.
//!
//! - [`fib`]: recursive doubling, one spawn per frame
//! - [`nqueens`]: backtracking enumeration, up to `n` spawns per frame
//! - [`qsort`]: in-place partition sort over disjoint ranges
//!
//! [`Runtime`]: crate::parallel::Runtime
//! [`ExecutionStrategy`]: crate::parallel::ExecutionStrategy

pub mod fib;
pub mod nqueens;
pub mod qsort;

pub use fib::fib;
pub use nqueens::{count_solutions, known_solution_count};
pub use qsort::{count_descents, partition, quicksort, seeded_input};

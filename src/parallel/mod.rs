//! Fork-join execution layer
//!
//! This module provides the spawn/join contract that every algorithm in the crate
//! is written against, and the executors that can fulfil it.
//!
//! # Architecture Responsibilities
//!
//! The parallel module focuses exclusively on **task decomposition plumbing** and
//! **execution strategy**:
//!
//! ## What This Module Does:
//! - **Frames**: Opens a structured scope per recursive call (`Runtime::fork_join`)
//! - **Spawning**: Registers children that may run inline or on another worker
//! - **Joining**: Guarantees every child finished before the frame's body returns
//! - **Resource Calculation**: Derives worker counts from `num_cpus::get()` and user limits
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know about boards, arrays or Fibonacci numbers
//! - **Granularity Control**: Never collapses spawns into sequential code on its own
//! - **Cancellation**: Every spawned child runs to completion
//!
//! # Serial Equivalence
//!
//! Whether a child runs inline or elsewhere is the executor's choice and must not
//! change any result:
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────────┐
//! │   Algorithm     │    │   Runtime        │    │   Executor          │
//! │                 │───▶│                  │───▶│                     │
//! │ • fork_join     │    │ • Frame          │    │ • inline (serial)   │
//! │ • spawn         │    │ • TaskHandle     │    │ • rayon pool        │
//! │ • combine       │    │ • ThreadBudget   │    │ • crossbeam threads │
//! └─────────────────┘    └──────────────────┘    └─────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use forkbench::parallel::{ExecutionStrategy, Runtime};
//!
//! fn sum(rt: &Runtime, values: &[u64]) -> u64 {
//!     if values.len() <= 1 {
//!         return values.iter().sum();
//!     }
//!     let (left, right) = values.split_at(values.len() / 2);
//!     let (left, right) = rt.fork_join(|frame| {
//!         let left = frame.spawn(move || sum(rt, left));
//!         (left, sum(rt, right))
//!     });
//!     left.get() + right
//! }
//!
//! let rt = Runtime::new(ExecutionStrategy::WorkStealing { workers: 2 })?;
//! assert_eq!(sum(&rt, &[1, 2, 3, 4, 5]), 15);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod budget;
pub mod core;
pub mod frame;
pub mod runtime;

// Re-export main types for easier access
pub use budget::ThreadBudget;
pub use core::{ExecutionStrategy, StrategyKind};
pub use frame::{Frame, TaskHandle};
pub use runtime::Runtime;

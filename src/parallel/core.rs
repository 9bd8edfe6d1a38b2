use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Executor family, as named on the command line and in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Run every spawned child inline (the serial elision)
    Sequential,
    /// Run children on a rayon work-stealing pool
    WorkStealing,
    /// Run children on crossbeam scoped threads, bounded by a thread budget
    Threads,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::WorkStealing => "work-stealing",
            StrategyKind::Threads => "threads",
        };
        f.write_str(name)
    }
}

/// Execution strategy enum for choosing how spawned children are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    WorkStealing { workers: usize },
    Threads { workers: usize },
}

impl ExecutionStrategy {
    /// Build a strategy from its kind and a pre-calculated worker count
    ///
    /// The worker count is ignored for `Sequential` and clamped to at least one
    /// otherwise.
    pub fn from_kind(kind: StrategyKind, workers: usize) -> Self {
        let workers = workers.max(1);
        match kind {
            StrategyKind::Sequential => ExecutionStrategy::Sequential,
            StrategyKind::WorkStealing => ExecutionStrategy::WorkStealing { workers },
            StrategyKind::Threads => ExecutionStrategy::Threads { workers },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            ExecutionStrategy::Sequential => StrategyKind::Sequential,
            ExecutionStrategy::WorkStealing { .. } => StrategyKind::WorkStealing,
            ExecutionStrategy::Threads { .. } => StrategyKind::Threads,
        }
    }

    /// Number of threads that may execute frames, including the caller
    pub fn workers(&self) -> usize {
        match self {
            ExecutionStrategy::Sequential => 1,
            ExecutionStrategy::WorkStealing { workers } | ExecutionStrategy::Threads { workers } => {
                *workers
            }
        }
    }

    /// Calculate optimal workers based on available system resources and configuration limits
    ///
    /// # Parameters
    /// - `max_threads_config`: User-specified maximum threads (0 = no limit)
    /// - `thread_percentage`: Percentage of CPU cores to utilize (e.g., 75 for 75%)
    ///
    /// # Algorithm
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    ///
    /// # Examples
    /// ```rust
    /// use forkbench::parallel::ExecutionStrategy;
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
    /// assert!(workers >= 1);
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(2, 100);
    /// assert!(workers <= 2);
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        // 0 means use percentage calculation only
        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::WorkStealing { workers } => {
                write!(f, "work-stealing ({workers} workers)")
            }
            ExecutionStrategy::Threads { workers } => write!(f, "threads ({workers} workers)"),
        }
    }
}

use anyhow::{Context, Result};
use std::any::Any;

use super::budget::ThreadBudget;
use super::core::ExecutionStrategy;
use super::frame::{Frame, FrameKind};

/// Stack size for every thread that runs frames
pub const DEFAULT_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Executor that frames are opened on
///
/// A runtime is built once per run from an [`ExecutionStrategy`] and shared by
/// reference with every frame of the task tree.
pub struct Runtime {
    strategy: ExecutionStrategy,
    kind: RuntimeKind,
    stack_size: usize,
}

enum RuntimeKind {
    Inline,
    WorkStealing(rayon::ThreadPool),
    Threads(ThreadBudget),
}

impl Runtime {
    pub fn new(strategy: ExecutionStrategy) -> Result<Self> {
        Self::with_stack_size(strategy, DEFAULT_STACK_SIZE)
    }

    /// Build a runtime whose worker threads get `stack_size` bytes of stack
    ///
    /// Recursion depth is bounded by this size. Partitions that leave one side
    /// empty on every step (long runs of equal keys) nest one frame per element.
    pub fn with_stack_size(strategy: ExecutionStrategy, stack_size: usize) -> Result<Self> {
        let kind = match strategy {
            ExecutionStrategy::Sequential => RuntimeKind::Inline,
            ExecutionStrategy::WorkStealing { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .stack_size(stack_size)
                    .thread_name(|index| format!("forkbench-worker-{index}"))
                    .build()
                    .context("Failed to build work-stealing thread pool")?;
                RuntimeKind::WorkStealing(pool)
            }
            // The calling thread counts as one worker
            ExecutionStrategy::Threads { workers } => {
                RuntimeKind::Threads(ThreadBudget::new(workers.saturating_sub(1)))
            }
        };

        tracing::debug!("Runtime ready: {} ({} byte stacks)", strategy, stack_size);
        Ok(Self {
            strategy,
            kind,
            stack_size,
        })
    }

    /// Runtime that runs every spawn inline
    pub fn sequential() -> Self {
        Self {
            strategy: ExecutionStrategy::Sequential,
            kind: RuntimeKind::Inline,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Run the root of a task tree on a thread with this runtime's stack size
    ///
    /// The work-stealing pool runs `body` on one of its workers; the other
    /// executors start a dedicated root thread and wait for it. A panic in
    /// `body` is re-raised on the caller.
    pub fn run<F, R>(&self, body: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if let RuntimeKind::WorkStealing(pool) = &self.kind {
            return Ok(pool.install(body));
        }

        let joined = crossbeam::thread::scope(|scope| -> Result<std::thread::Result<R>> {
            let root = scope
                .builder()
                .name("forkbench-root".to_string())
                .stack_size(self.stack_size)
                .spawn(move |_| body())
                .context("Failed to start the root thread")?;
            Ok(root.join())
        })
        .unwrap_or_else(|payload| rethrow(payload))?;

        Ok(joined.unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
    }

    /// Open a frame, run `body` in it, and join every child it spawned
    ///
    /// Returns only after all children spawned through the frame have
    /// completed, so their results and side effects are visible to the caller.
    /// Calling `fork_join` several times from one function gives several join
    /// points. A panic in any child is re-raised here.
    pub fn fork_join<'scope, F, R>(&'scope self, body: F) -> R
    where
        F: FnOnce(&Frame<'_, 'scope>) -> R + Send,
        R: Send,
    {
        match &self.kind {
            RuntimeKind::Inline => body(&Frame::new(FrameKind::Inline)),
            RuntimeKind::WorkStealing(pool) => {
                pool.scope(|scope| body(&Frame::new(FrameKind::WorkStealing(scope))))
            }
            RuntimeKind::Threads(budget) => {
                let joined = crossbeam::thread::scope(|scope| {
                    body(&Frame::new(FrameKind::Threads {
                        scope,
                        budget,
                        stack_size: self.stack_size,
                    }))
                });
                joined.unwrap_or_else(|payload| rethrow(payload))
            }
        }
    }

    /// Number of threads that may run frames at once
    pub fn workers(&self) -> usize {
        match &self.kind {
            RuntimeKind::Inline => 1,
            RuntimeKind::WorkStealing(pool) => pool.current_num_threads(),
            RuntimeKind::Threads(budget) => budget.capacity() + 1,
        }
    }
}

/// Re-raise the first child panic collected by a crossbeam scope
fn rethrow(payload: Box<dyn Any + Send>) -> ! {
    match payload.downcast::<Vec<Box<dyn Any + Send>>>() {
        Ok(mut panics) if !panics.is_empty() => std::panic::resume_unwind(panics.swap_remove(0)),
        Ok(panics) => std::panic::resume_unwind(panics),
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("strategy", &self.strategy)
            .field("workers", &self.workers())
            .field("stack_size", &self.stack_size)
            .finish()
    }
}

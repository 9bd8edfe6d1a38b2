use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::budget::ThreadBudget;

/// One activation of a recursive call, as seen by the children it spawns
///
/// A frame is handed to the body passed to [`Runtime::fork_join`]. Children
/// spawned through it may borrow anything that outlives `'scope`, and all of
/// them have completed by the time `fork_join` returns. A frame cannot be
/// shared with its children: each child opens its own frame when it recurses.
///
/// [`Runtime::fork_join`]: super::Runtime::fork_join
pub struct Frame<'f, 'scope> {
    kind: FrameKind<'f, 'scope>,
    spawned: Cell<usize>,
}

#[derive(Clone, Copy)]
pub(crate) enum FrameKind<'f, 'scope> {
    Inline,
    WorkStealing(&'f rayon::Scope<'scope>),
    Threads {
        scope: &'f crossbeam::thread::Scope<'scope>,
        budget: &'scope ThreadBudget,
        stack_size: usize,
    },
}

impl<'f, 'scope> Frame<'f, 'scope> {
    pub(crate) fn new(kind: FrameKind<'f, 'scope>) -> Self {
        Self {
            kind,
            spawned: Cell::new(0),
        }
    }

    /// Spawn a child whose result is read through the returned handle after the join
    pub fn spawn<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'scope,
        T: Send + 'scope,
    {
        if let FrameKind::Inline = self.kind {
            self.spawned.set(self.spawned.get() + 1);
            return TaskHandle::ready(task());
        }

        let (handle, slot) = TaskHandle::pending();
        self.dispatch(move || slot.fill(task()));
        handle
    }

    /// Spawn a child that writes its result into a slot owned by the parent
    ///
    /// The slot holds the child's result once the frame has joined. Slots that
    /// no child was spawned into keep whatever the parent initialised them with.
    pub fn spawn_into<F, T>(&self, slot: &'scope mut T, task: F)
    where
        F: FnOnce() -> T + Send + 'scope,
        T: Send + 'scope,
    {
        self.dispatch(move || *slot = task());
    }

    /// Number of children spawned in this frame so far
    pub fn spawned(&self) -> usize {
        self.spawned.get()
    }

    /// Whether children of this frame always run on the spawning thread
    pub fn is_inline(&self) -> bool {
        matches!(self.kind, FrameKind::Inline)
    }

    fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'scope,
    {
        self.spawned.set(self.spawned.get() + 1);
        match self.kind {
            FrameKind::Inline => job(),
            FrameKind::WorkStealing(scope) => scope.spawn(move |_| job()),
            FrameKind::Threads {
                scope,
                budget,
                stack_size,
            } => match budget.try_acquire() {
                Some(permit) => {
                    // Shared so the job survives a failed thread start
                    let job = Arc::new(Mutex::new(Some(job)));
                    let remote = Arc::clone(&job);
                    let started = scope.builder().stack_size(stack_size).spawn(move |_| {
                        let _permit = permit;
                        if let Some(job) = take_job(&remote) {
                            job();
                        }
                    });
                    if let Err(err) = started {
                        tracing::warn!("Failed to start worker thread, running inline: {}", err);
                        if let Some(job) = take_job(&job) {
                            job();
                        }
                    }
                }
                // Budget exhausted: the child runs here instead
                None => job(),
            },
        }
    }
}

fn take_job<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl fmt::Debug for Frame<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FrameKind::Inline => "inline",
            FrameKind::WorkStealing(_) => "work-stealing",
            FrameKind::Threads { .. } => "threads",
        };
        f.debug_struct("Frame")
            .field("kind", &kind)
            .field("spawned", &self.spawned.get())
            .finish()
    }
}

/// Reference to a spawned child's eventual result
///
/// The value is only guaranteed to be present once the `fork_join` call that
/// spawned the child has returned.
#[derive(Debug)]
pub struct TaskHandle<T> {
    state: HandleState<T>,
}

#[derive(Debug)]
enum HandleState<T> {
    Ready(T),
    Pending(Arc<Mutex<Option<T>>>),
}

/// Write side of a pending [`TaskHandle`], moved into the child
struct ResultSlot<T>(Arc<Mutex<Option<T>>>);

impl<T> ResultSlot<T> {
    fn fill(self, value: T) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }
}

impl<T> TaskHandle<T> {
    fn ready(value: T) -> Self {
        Self {
            state: HandleState::Ready(value),
        }
    }

    fn pending() -> (Self, ResultSlot<T>) {
        let slot = Arc::new(Mutex::new(None));
        let handle = Self {
            state: HandleState::Pending(Arc::clone(&slot)),
        };
        (handle, ResultSlot(slot))
    }

    /// Take the child's result
    ///
    /// # Panics
    ///
    /// Panics if called before the spawning frame has joined and the child has
    /// not finished yet.
    pub fn get(self) -> T {
        match self.state {
            HandleState::Ready(value) => value,
            HandleState::Pending(slot) => slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
                .expect("task handle read before its frame joined"),
        }
    }
}

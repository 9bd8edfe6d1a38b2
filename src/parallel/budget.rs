use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared count of extra threads the `Threads` executor may still start
///
/// A spawn that obtains a permit runs on its own scoped thread; a spawn that
/// does not runs inline. Permits go back to the budget when the child finishes,
/// so at most `capacity` children run on extra threads at any moment.
#[derive(Debug)]
pub struct ThreadBudget {
    capacity: usize,
    available: AtomicUsize,
}

/// Proof that one thread of a [`ThreadBudget`] is in use; released on drop
#[derive(Debug)]
pub struct BudgetPermit<'a> {
    budget: &'a ThreadBudget,
}

impl ThreadBudget {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: AtomicUsize::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take one permit if any is left
    pub fn try_acquire(&self) -> Option<BudgetPermit<'_>> {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .ok()
            .map(|_| BudgetPermit { budget: self })
    }
}

impl Drop for BudgetPermit<'_> {
    fn drop(&mut self) {
        self.budget.available.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let budget = ThreadBudget::new(2);
        let first = budget.try_acquire();
        let second = budget.try_acquire();
        assert!(first.is_some());
        assert!(second.is_some());
        assert!(budget.try_acquire().is_none());
    }

    #[test]
    fn test_permit_released_on_drop() {
        let budget = ThreadBudget::new(1);
        {
            let _permit = budget.try_acquire().unwrap();
            assert!(budget.try_acquire().is_none());
        }
        let again = budget.try_acquire();
        assert!(again.is_some());
        assert!(budget.try_acquire().is_none());
    }

    #[test]
    fn test_zero_capacity() {
        let budget = ThreadBudget::new(0);
        assert_eq!(budget.capacity(), 0);
        assert!(budget.try_acquire().is_none());
    }
}

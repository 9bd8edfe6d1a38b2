use crate::parallel::Runtime;

/// Fibonacci number `F(n)` by recursive doubling
///
/// Every non-terminal frame spawns `F(n-1)`, computes `F(n-2)` itself and
/// joins before adding. Values of `n` below 2 are returned unchanged.
pub fn fib(rt: &Runtime, n: i64) -> i64 {
    if n < 2 {
        return n;
    }

    let (x, y) = rt.fork_join(|frame| {
        let x = frame.spawn(move || fib(rt, n - 1));
        let y = fib(rt, n - 2);
        (x, y)
    });

    x.get() + y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::ExecutionStrategy;

    fn iterative(n: i64) -> i64 {
        let (mut a, mut b) = (0, 1);
        for _ in 0..n {
            (a, b) = (b, a + b);
        }
        a
    }

    #[test]
    fn test_base_cases() {
        let rt = Runtime::sequential();
        assert_eq!(fib(&rt, 0), 0);
        assert_eq!(fib(&rt, 1), 1);
        assert_eq!(fib(&rt, -3), -3);
    }

    #[test]
    fn test_fib_ten() {
        let rt = Runtime::sequential();
        assert_eq!(fib(&rt, 10), 55);
    }

    #[test]
    fn test_matches_iterative_under_every_strategy() {
        let strategies = [
            ExecutionStrategy::Sequential,
            ExecutionStrategy::WorkStealing { workers: 4 },
            ExecutionStrategy::Threads { workers: 4 },
        ];
        for strategy in strategies {
            let rt = Runtime::new(strategy).unwrap();
            for n in 0..=20 {
                assert_eq!(fib(&rt, n), iterative(n), "fib({n}) under {strategy}");
            }
        }
    }
}

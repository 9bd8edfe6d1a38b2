use crate::parallel::Runtime;

/// Reference counts of complete placements for boards of size 1 through 15
const KNOWN_SOLUTIONS: [u64; 15] = [
    1, 0, 0, 2, 10, 4, 40, 92, 352, 724, 2680, 14200, 73712, 365596, 2279184,
];

/// Count the ways to place `n` non-attacking queens on an `n x n` board
pub fn count_solutions(rt: &Runtime, n: usize) -> u64 {
    place(rt, n, Vec::with_capacity(n))
}

/// Expected count for board size `n`, when it is in the reference table
pub fn known_solution_count(n: usize) -> Option<u64> {
    match n {
        0 => Some(1),
        _ => KNOWN_SOLUTIONS.get(n - 1).copied(),
    }
}

/// Whether the last queen of `board` is safe from all queens before it
///
/// `board[c]` is the row of the queen in column `c`. Runs in time linear in the
/// board length: only the newest queen is checked.
pub fn is_safe(board: &[usize]) -> bool {
    let Some((&row, placed)) = board.split_last() else {
        return true;
    };
    let column = placed.len();

    placed
        .iter()
        .enumerate()
        .all(|(c, &r)| r != row && r.abs_diff(row) != column - c)
}

/// One frame of the search; `board` holds the rows placed so far and is owned by this frame
fn place(rt: &Runtime, n: usize, mut board: Vec<usize>) -> u64 {
    let column = board.len();
    if column == n {
        return 1;
    }

    // Slot i receives the count below row i; unspawned slots stay zero
    let mut counts = vec![0u64; n];
    board.push(0);

    rt.fork_join(|frame| {
        for (row, slot) in counts.iter_mut().enumerate() {
            board[column] = row;
            if is_safe(&board) {
                let mut child = Vec::with_capacity(n);
                child.extend_from_slice(&board);
                frame.spawn_into(slot, move || place(rt, n, child));
            }
        }
    });

    counts.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::ExecutionStrategy;

    #[test]
    fn test_empty_board() {
        let rt = Runtime::sequential();
        assert_eq!(count_solutions(&rt, 0), 1);
    }

    #[test]
    fn test_four_queens() {
        let rt = Runtime::sequential();
        assert_eq!(count_solutions(&rt, 4), 2);
    }

    #[test]
    fn test_known_sequence() {
        let rt = Runtime::new(ExecutionStrategy::WorkStealing { workers: 4 }).unwrap();
        let expected = [
            (1, 1),
            (2, 0),
            (3, 0),
            (4, 2),
            (5, 10),
            (6, 4),
            (7, 40),
            (8, 92),
            (9, 352),
            (10, 724),
        ];
        for (n, count) in expected {
            assert_eq!(count_solutions(&rt, n), count, "n = {n}");
        }
    }

    #[test]
    fn test_larger_boards() {
        let rt = Runtime::new(ExecutionStrategy::WorkStealing { workers: 4 }).unwrap();
        assert_eq!(count_solutions(&rt, 11), 2680);
        assert_eq!(count_solutions(&rt, 12), 14200);
    }

    #[test]
    #[ignore = "takes minutes in debug builds"]
    fn test_benchmark_boards() {
        let rt = Runtime::new(ExecutionStrategy::WorkStealing { workers: 4 }).unwrap();
        for n in [13, 14] {
            let counted = rt.run(|| count_solutions(&rt, n)).unwrap();
            assert_eq!(Some(counted), known_solution_count(n), "n = {n}");
        }
    }

    #[test]
    fn test_strategies_agree() {
        let results: Vec<u64> = [
            ExecutionStrategy::Sequential,
            ExecutionStrategy::WorkStealing { workers: 3 },
            ExecutionStrategy::Threads { workers: 3 },
        ]
        .into_iter()
        .map(|strategy| count_solutions(&Runtime::new(strategy).unwrap(), 8))
        .collect();
        assert_eq!(results, vec![92, 92, 92]);
    }

    #[test]
    fn test_is_safe() {
        assert!(is_safe(&[]));
        assert!(is_safe(&[3]));
        // Same row
        assert!(!is_safe(&[1, 1]));
        // Diagonals in both directions
        assert!(!is_safe(&[0, 1]));
        assert!(!is_safe(&[2, 1]));
        assert!(!is_safe(&[0, 3, 2]));
        assert!(is_safe(&[1, 3, 0, 2]));
        // Only the newest queen is checked
        assert!(is_safe(&[0, 0, 3]));
    }

    #[test]
    fn test_only_safe_rows_are_spawned() {
        let rt = Runtime::sequential();
        let board = vec![1usize];
        let spawned = rt.fork_join(|frame| {
            for row in 0..4 {
                let mut candidate = board.clone();
                candidate.push(row);
                if is_safe(&candidate) {
                    frame.spawn(|| ());
                }
            }
            frame.spawned()
        });
        // Row 3 is the only safe second queen next to a queen in row 1
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_known_solution_count() {
        assert_eq!(known_solution_count(0), Some(1));
        assert_eq!(known_solution_count(8), Some(92));
        assert_eq!(known_solution_count(14), Some(365596));
        assert_eq!(known_solution_count(15), Some(2279184));
        assert_eq!(known_solution_count(16), None);
    }
}

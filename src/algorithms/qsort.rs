use anyhow::{Context, Result};

use crate::parallel::Runtime;

/// Seed used by the default benchmark input
pub const DEFAULT_SEED: u32 = 13;

/// Sort `data` in place by parallel quicksort
///
/// The last element is the pivot. After the partition, the upper range is
/// spawned and the lower range is sorted in the current frame; the two ranges
/// are disjoint slices of `data`. The lower range is handled by looping rather
/// than recursing, so already-sorted input does not nest a frame per element.
/// The sort is not stable.
pub fn quicksort<T: Ord + Send>(rt: &Runtime, data: &mut [T]) {
    rt.fork_join(|frame| {
        let mut range = data;
        while range.len() > 1 {
            let middle = place_pivot(range);
            let whole = std::mem::take(&mut range);
            let (lower, upper) = whole.split_at_mut(middle);
            let upper = &mut upper[1..];

            if !upper.is_empty() {
                frame.spawn(move || quicksort(rt, upper));
            }
            range = lower;
        }
    });
}

/// Partition around the last element and move it to the boundary
fn place_pivot<T: Ord>(range: &mut [T]) -> usize {
    let Some((pivot, rest)) = range.split_last_mut() else {
        return 0;
    };
    let middle = partition(rest, pivot);
    // Move the pivot to the first element not less than it
    let last = range.len() - 1;
    range.swap(middle, last);
    middle
}

/// Partition `range` around `pivot` and return the boundary
///
/// Scans from the front, stepping past elements less than the pivot and
/// swapping every other element to the shrinking tail. On return every element
/// before the boundary is `< pivot` and every element from it on is `>= pivot`.
pub fn partition<T: Ord>(range: &mut [T], pivot: &T) -> usize {
    let mut begin = 0;
    let mut end = range.len();

    while begin < end {
        if range[begin] < *pivot {
            begin += 1;
        } else {
            end -= 1;
            range.swap(begin, end);
        }
    }

    end
}

/// Pseudorandom benchmark input, identical across runs for the same seed
///
/// Follows the POSIX `rand_r` generator so inputs match the classic C harness
/// value for value. Fails if the buffer cannot be allocated.
pub fn seeded_input(len: usize, seed: u32) -> Result<Vec<i32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .with_context(|| format!("Failed to allocate {len} integers"))?;

    let mut state = seed;
    data.extend((0..len).map(|_| rand_r(&mut state)));
    Ok(data)
}

/// Number of adjacent pairs that are out of order; zero means sorted
pub fn count_descents<T: Ord>(data: &[T]) -> usize {
    data.windows(2).filter(|pair| pair[1] < pair[0]).count()
}

fn rand_r(state: &mut u32) -> i32 {
    let mut next = *state;

    next = next.wrapping_mul(1103515245).wrapping_add(12345);
    let mut result = (next / 65536) % 2048;

    next = next.wrapping_mul(1103515245).wrapping_add(12345);
    result <<= 10;
    result ^= (next / 65536) % 1024;

    next = next.wrapping_mul(1103515245).wrapping_add(12345);
    result <<= 10;
    result ^= (next / 65536) % 1024;

    *state = next;
    result as i32
}

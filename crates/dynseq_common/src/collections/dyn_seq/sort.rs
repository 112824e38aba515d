//! Partition-exchange sort (quicksort) over a slice of initialized elements.
//!
//! The pivot is always the last element of the range being partitioned, and elements comparing equal to the pivot end up on the low side.
//! `compare` receives the index of the scanned element in the whole sequence (slice index + `offset`), so failures can name it.

use core::{cmp::Ordering, ops::Range};

/// Sorts `v` in place.
///
/// Ranges are processed in the same order as the textbook recursion (the low partition is fully sorted before the high one),
/// but the pending ranges live on the heap, so already sorted input cannot overflow the call stack.
pub(super) fn quick_sort<T, E, F>(v: &mut [T], offset: usize, compare: &mut F) -> Result<(), E> where
    F: FnMut(&T, &T, usize) -> Result<Ordering, E>
{
    // The last range is sorted next
    let mut pending: Vec<Range<usize>> = Vec::new();
    if v.len() > 1 {
        pending.push(0..v.len());
    }

    while let Some(range) = pending.pop() {
        let start = range.start;
        let pivot_idx = start + partition(&mut v[range.clone()], offset + start, compare)?;

        let low = start..pivot_idx;
        let high = pivot_idx + 1..range.end;
        if high.len() > 1 {
            pending.push(high);
        }
        if low.len() > 1 {
            pending.push(low);
        }
    }
    Ok(())
}

/// Lomuto partition around the last element, returns the final index of the pivot.
fn partition<T, E, F>(v: &mut [T], offset: usize, compare: &mut F) -> Result<usize, E> where
    F: FnMut(&T, &T, usize) -> Result<Ordering, E>
{
    let high = v.len() - 1;
    // Everything before `boundary` compares less or equal to the pivot
    let mut boundary = 0;

    for idx in 0..high {
        if compare(&v[idx], &v[high], offset + idx)? != Ordering::Greater {
            v.swap(boundary, idx);
            boundary += 1;
        }
    }

    v.swap(boundary, high);
    Ok(boundary)
}

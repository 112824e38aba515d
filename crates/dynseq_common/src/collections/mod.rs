mod imp;
mod dyn_seq;

use core::fmt;

pub use dyn_seq::DynamicSequence;

/// Capacity used by [`DynamicSequence::new`] and restored by [`DynamicSequence::clear`].
pub const DEFAULT_CAPACITY: usize = 10;

static_assertions::const_assert!(DEFAULT_CAPACITY > 0);

//--------------------------------------------------------------

/// Errors returned by the fallible [`DynamicSequence`] operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SequenceError {
    /// A sequence was requested with an unusable initial capacity
    InvalidCapacity(usize),
    /// A positional operation was given an index outside of its valid range
    IndexOutOfRange { index: usize, len: usize },
    /// No ordering exists between the element at `index` and the pivot it was compared with
    Unsortable { index: usize },
    /// The requested capacity does not fit in memory
    CapacityOverflow,
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::InvalidCapacity(cap)          => f.write_fmt(format_args!("Illegal capacity: {cap}, capacity needs to be larger than 0")),
            SequenceError::IndexOutOfRange { index, len } => f.write_fmt(format_args!("Index out of range: {index} (len is {len})")),
            SequenceError::Unsortable { index }          => f.write_fmt(format_args!("Elements are not comparable: element at index {index} has no ordering with the pivot")),
            SequenceError::CapacityOverflow              => f.write_str("Capacity overflow"),
        }
    }
}

impl std::error::Error for SequenceError {}

#[cold]
#[track_caller]
pub(crate) fn reserve_failed(err: SequenceError) -> ! {
    panic!("failed to reserve storage: {err}")
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `Err(SequenceError::CapacityOverflow)` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, SequenceError>;
}

/// A reserve strategy that will try to either return double the current capacity, or the minimum required capacity, whichever is bigger.
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, SequenceError> {
        let double_cap = cur_capacity.saturating_mul(2);
        let new_cap = if double_cap > min_capacity { double_cap } else { min_capacity };
        if new_cap <= isize::MAX as usize {
            Ok(new_cap)
        } else if min_capacity <= isize::MAX as usize {
            Ok(isize::MAX as usize)
        } else {
            Err(SequenceError::CapacityOverflow)
        }
    }
}

/// A reserve strategy that will return a power of 2 capacity
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Result<usize, SequenceError> {
        match min_capacity.checked_next_power_of_two() {
            Some(new_cap) if new_cap <= isize::MAX as usize => Ok(new_cap),
            _ => Err(SequenceError::CapacityOverflow),
        }
    }
}

/// A reserve stategy that grows the capacity by 1.5
pub struct ThreeHalvesReserveStrategy;

impl ReserveStrategy for ThreeHalvesReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, SequenceError> {
        if min_capacity > isize::MAX as usize {
            return Err(SequenceError::CapacityOverflow);
        }

        // A capacity of 1 would never grow
        let mut cap = cur_capacity.max(2);
        while cap < min_capacity {
            cap = cap.saturating_add(cap - (cap >> 1));
        }
        Ok(cap.min(isize::MAX as usize))
    }
}

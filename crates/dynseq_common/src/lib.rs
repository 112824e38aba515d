//! Generic growable sequence container with index-checked mutation and an in-place quicksort.

#[macro_use]
mod log;

pub mod collections;
pub mod prelude;

pub use collections::{DynamicSequence, SequenceError};

/// Creates a [`DynamicSequence`] containing the arguments.
///
/// ```
/// use dynseq_common::dynseq;
///
/// let seq = dynseq![1, 2, 3];
/// assert_eq!(seq, [1, 2, 3]);
///
/// let zeros = dynseq![0; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dynseq {
    () => {
        $crate::collections::DynamicSequence::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::DynamicSequence::from_elem($elem, $n)
    };
    ($($val:expr),+ $(,)?) => {
        $crate::collections::DynamicSequence::from([$($val),+])
    };
}

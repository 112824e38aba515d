use core::{
    cmp::Ordering,
    convert::Infallible,
    fmt,
    marker::PhantomData,
    mem,
    ops::{Bound, Index, Range, RangeBounds},
    slice,
};
use std::time::Instant;

use super::{imp::buffer::RawBuffer, reserve_failed, DoubleOrMinReserveStrategy, ReserveStrategy, SequenceError, DEFAULT_CAPACITY};

mod sort;

/// A contiguous growable sequence, with index-checked mutation and an in-place quicksort.
///
/// The sequence owns a buffer of `capacity()` slots, of which the first `len()` hold elements.
/// Appending to a full sequence grows the buffer according to the reserve strategy `R`,
/// which by default doubles the capacity (or grows to the required capacity, whichever is bigger),
/// giving amortized *O*(1) appends.
///
/// # Examples
///
/// ```
/// use dynseq_common::DynamicSequence;
///
/// let mut seq = DynamicSequence::new();
/// seq.append(5);
/// seq.append(1);
/// seq.insert_at(1, 3).unwrap();
/// assert_eq!(seq, [5, 3, 1]);
///
/// seq.sort();
/// assert_eq!(seq, [1, 3, 5]);
///
/// assert!(seq.get(3).is_err());
/// ```
///
/// # Capacity and reallocation
///
/// A new sequence starts out with [`DEFAULT_CAPACITY`] slots, or with the capacity passed to [`DynamicSequence::with_capacity`].
/// The buffer only grows when an element needs to be written past the last slot, so a sequence with capacity `n` can hold `n` elements before reallocating.
/// The buffer never shrinks, except through [`DynamicSequence::clear`], which resets it back to [`DEFAULT_CAPACITY`].
///
/// # Element access
///
/// Elements are handed out as shared borrows ([`get`], [`as_slice`], [`Index`]) or moved out ([`update_at`], [`delete_at`]).
/// The only way to change an element in place is to replace it with [`update_at`].
///
/// [`get`]: DynamicSequence::get
/// [`as_slice`]: DynamicSequence::as_slice
/// [`update_at`]: DynamicSequence::update_at
/// [`delete_at`]: DynamicSequence::delete_at
pub struct DynamicSequence<T, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    buf:       RawBuffer<T>,
    len:       usize,
    _strategy: PhantomData<fn() -> R>,
}

impl<T> DynamicSequence<T> {
    /// Constructs a new, empty `DynamicSequence<T>` with a capacity of [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy()
    }

    /// Constructs a new, empty `DynamicSequence<T>` with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidCapacity`] when `capacity` is 0,
    /// and [`SequenceError::CapacityOverflow`] when the buffer would exceed `isize::MAX` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, SequenceError> {
        Self::with_capacity_and_strategy(capacity)
    }

    /// Constructs a sequence holding `n` clones of `elem`.
    ///
    /// The capacity is `n`, or [`DEFAULT_CAPACITY`] if `n` is smaller.
    pub fn from_elem(elem: T, n: usize) -> Self where
        T: Clone
    {
        let mut seq = Self::with_strategy_and_min_capacity(n);
        seq.extend(core::iter::repeat(elem).take(n));
        seq
    }
}

impl<T, R: ReserveStrategy> DynamicSequence<T, R> {
    /// Constructs a new, empty sequence using the reserve strategy `R`, with a capacity of [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn with_strategy() -> Self {
        Self::from_buffer(RawBuffer::with_capacity(DEFAULT_CAPACITY))
    }

    /// Constructs a new, empty sequence using the reserve strategy `R`, with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// See [`DynamicSequence::with_capacity`].
    pub fn with_capacity_and_strategy(capacity: usize) -> Result<Self, SequenceError> {
        if capacity == 0 {
            return Err(SequenceError::InvalidCapacity(capacity));
        }
        Ok(Self::from_buffer(RawBuffer::try_with_capacity(capacity)?))
    }

    fn with_strategy_and_min_capacity(min_capacity: usize) -> Self {
        Self::from_buffer(RawBuffer::with_capacity(min_capacity.max(DEFAULT_CAPACITY)))
    }

    fn from_buffer(buf: RawBuffer<T>) -> Self {
        Self { buf, len: 0, _strategy: PhantomData }
    }

    /// Returns the number of elements in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of elements in the sequence, same as [`DynamicSequence::len`].
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the sequence can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Extracts a slice containing all elements in order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is always initialized
        unsafe { self.buf.slice(self.len) }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is always initialized
        unsafe { self.buf.slice_mut(self.len) }
    }

    /// Returns an iterator over the elements, in order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    //--------------------------------------------------------------

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            reserve_failed(err);
        }
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::CapacityOverflow`] if the capacity overflows, the sequence is unchanged in that case.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), SequenceError> {
        let min_capacity = self.len.checked_add(additional).ok_or(SequenceError::CapacityOverflow)?;
        self.ensure_capacity(min_capacity)
    }

    /// Guarantees `capacity() >= min_capacity` afterwards, only touching the buffer when it is too small.
    fn ensure_capacity(&mut self, min_capacity: usize) -> Result<(), SequenceError> {
        let cur_capacity = self.buf.capacity();
        if min_capacity <= cur_capacity {
            return Ok(());
        }

        let new_capacity = R::calculate(cur_capacity, min_capacity)?;
        // SAFETY: `[0, len)` is initialized, and `len <= cur_capacity < min_capacity <= new_capacity`
        unsafe { self.buf.grow_to(new_capacity, self.len)? };

        seq_verbose!("grew capacity from {cur_capacity} to {new_capacity} (len {})", self.len);
        Ok(())
    }

    /// Grow when the next write would land past the last slot.
    #[inline]
    fn reserve_one(&mut self) -> Result<(), SequenceError> {
        if self.len == self.buf.capacity() {
            self.ensure_capacity(self.len + 1)
        } else {
            Ok(())
        }
    }

    //--------------------------------------------------------------

    fn range_check(&self, index: usize, limit: usize) -> Result<(), SequenceError> {
        if index < limit {
            Ok(())
        } else {
            Err(SequenceError::IndexOutOfRange { index, len: self.len })
        }
    }

    /// Valid for reading, updating and deleting: `index < len`
    #[inline]
    fn check_access(&self, index: usize) -> Result<(), SequenceError> {
        self.range_check(index, self.len)
    }

    /// Valid for inserting: `index <= len`
    #[inline]
    fn check_insert(&self, index: usize) -> Result<(), SequenceError> {
        self.range_check(index, self.len + 1)
    }

    //--------------------------------------------------------------

    /// Appends an element to the back of the sequence.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn append(&mut self, value: T) {
        if let Err(err) = self.reserve_one() {
            reserve_failed(err);
        }
        self.buf.write(self.len, value);
        self.len += 1;
    }

    /// Inserts an element at position `index`, shifting all elements after it to the right.
    ///
    /// `index == len()` appends the element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index > len()`, or [`SequenceError::CapacityOverflow`] if the sequence could not grow.
    /// The sequence is unchanged on error.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), SequenceError> {
        self.check_insert(index)?;
        self.reserve_one()?;

        // SAFETY: `index <= len < capacity`, and the duplicated `index`th slot is over written right after
        unsafe { self.buf.shift_right(index, self.len) };
        self.buf.write(index, value);
        self.len += 1;
        Ok(())
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T, SequenceError> {
        self.check_access(index)?;
        Ok(&self.as_slice()[index])
    }

    /// Replaces the element at `index` with `value`, returning the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len()`, `value` is dropped in that case.
    pub fn update_at(&mut self, index: usize, value: T) -> Result<T, SequenceError> {
        self.check_access(index)?;
        Ok(mem::replace(&mut self.as_mut_slice()[index], value))
    }

    /// Removes and returns the element at `index`, shifting all elements after it to the left.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index >= len()`.
    pub fn delete_at(&mut self, index: usize) -> Result<T, SequenceError> {
        self.check_access(index)?;

        // SAFETY: `index < len`, the element is moved out before its slot is over written
        let value = unsafe {
            let value = self.buf.read(index);
            self.buf.shift_left(index, self.len);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Drops all elements and resets the buffer to [`DEFAULT_CAPACITY`] slots.
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        let mut old_buf = mem::replace(&mut self.buf, RawBuffer::with_capacity(DEFAULT_CAPACITY));
        // SAFETY: `[0, len)` of the old buffer is initialized, and the buffer is gone after this
        unsafe { old_buf.drop_prefix(len) };

        seq_verbose!("cleared {len} elements");
    }

    //--------------------------------------------------------------

    /// Sorts the sequence by the natural ordering of its elements.
    ///
    /// Uses a quicksort with the last element of each range as pivot: *O*(*n* log *n*) on average,
    /// *O*(*n*²) for already sorted input. The sort is in place and not stable.
    pub fn sort(&mut self) where
        T: Ord
    {
        self.sort_by(T::cmp)
    }

    /// Sorts the sequence with a comparator function, which is used for every comparison.
    ///
    /// See [`DynamicSequence::sort`] for the algorithm.
    pub fn sort_by<F>(&mut self, mut compare: F) where
        F: FnMut(&T, &T) -> Ordering
    {
        let range = 0..self.len;
        let res = self.quick_sort_range(range, |a, b, _| Ok::<_, Infallible>(compare(a, b)));
        match res {
            Ok(()) => (),
            Err(never) => match never {},
        }
    }

    /// Sorts the elements in `range` with a comparator function, leaving the rest of the sequence untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if the range does not lie within `[0, len()]`,
    /// reporting the offending bound (the end bound is reported exclusive).
    pub fn sort_range_by<B, F>(&mut self, range: B, mut compare: F) -> Result<(), SequenceError> where
        B: RangeBounds<usize>,
        F: FnMut(&T, &T) -> Ordering
    {
        let range = self.resolve_range(range)?;
        self.quick_sort_range(range, |a, b, _| Ok(compare(a, b)))
    }

    /// Sorts the sequence by a partial ordering.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Unsortable`] when two elements have no ordering, see [`DynamicSequence::try_sort_by`].
    pub fn try_sort(&mut self) -> Result<(), SequenceError> where
        T: PartialOrd
    {
        self.try_sort_by(T::partial_cmp)
    }

    /// Sorts the sequence with a comparator that can report that two elements have no ordering.
    ///
    /// Before anything is moved, every element is compared with itself:
    /// an element without an ordering to itself (e.g. a float `NaN`) fails the sort and leaves the sequence untouched.
    /// A pair of distinct elements without an ordering is only detected when they are compared,
    /// in which case the sequence is left partially rearranged, though still holding the same elements.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Unsortable`] with the index of the element that could not be ordered.
    pub fn try_sort_by<F>(&mut self, mut compare: F) -> Result<(), SequenceError> where
        F: FnMut(&T, &T) -> Option<Ordering>
    {
        if let Some(index) = self.iter().position(|elem| compare(elem, elem).is_none()) {
            return Err(SequenceError::Unsortable { index });
        }

        let range = 0..self.len;
        self.quick_sort_range(range, |a, b, index| compare(a, b).ok_or(SequenceError::Unsortable { index }))
    }

    fn quick_sort_range<E, F>(&mut self, range: Range<usize>, mut compare: F) -> Result<(), E> where
        F: FnMut(&T, &T, usize) -> Result<Ordering, E>
    {
        let count = range.len();
        let _timer = scopeguard::guard(Instant::now(), move |start| {
            seq_debug!("sorted {count} elements in {:?}", start.elapsed());
        });

        let offset = range.start;
        sort::quick_sort(&mut self.as_mut_slice()[range], offset, &mut compare)
    }

    fn resolve_range<B: RangeBounds<usize>>(&self, range: B) -> Result<Range<usize>, SequenceError> {
        let len = self.len;
        let out_of_range = |index| SequenceError::IndexOutOfRange { index, len };

        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1).ok_or(out_of_range(start))?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1).ok_or(out_of_range(end))?,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };

        if end > len {
            Err(out_of_range(end))
        } else if start > end {
            Err(out_of_range(start))
        } else {
            Ok(start..end)
        }
    }
}

impl<T, R: ReserveStrategy> Drop for DynamicSequence<T, R> {
    fn drop(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: `[0, len)` is initialized, the buffer itself is freed when the field is dropped
        unsafe { self.buf.drop_prefix(len) };
    }
}

//--------------------------------------------------------------

impl<T, R: ReserveStrategy> Default for DynamicSequence<T, R> {
    fn default() -> Self {
        Self::with_strategy()
    }
}

impl<T: Clone, R: ReserveStrategy> Clone for DynamicSequence<T, R> {
    fn clone(&self) -> Self {
        let mut seq = Self::from_buffer(RawBuffer::with_capacity(self.capacity()));
        for elem in self {
            seq.append(elem.clone());
        }
        seq
    }
}

impl<T, R: ReserveStrategy> Index<usize> for DynamicSequence<T, R> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        #[cold]
        #[track_caller]
        fn index_failed(index: usize, len: usize) -> ! {
            panic!("index out of range: the len is {len} but the index is {index}");
        }

        match self.get(index) {
            Ok(elem) => elem,
            Err(_) => index_failed(index, self.len),
        }
    }
}

impl<T, R: ReserveStrategy> Extend<T> for DynamicSequence<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for elem in iter {
            self.append(elem);
        }
    }
}

impl<'a, T: Copy + 'a, R: ReserveStrategy> Extend<&'a T> for DynamicSequence<T, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T, R: ReserveStrategy> FromIterator<T> for DynamicSequence<T, R> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut seq = Self::with_strategy_and_min_capacity(iter.size_hint().0);
        seq.extend(iter);
        seq
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicSequence<T> {
    fn from(arr: [T; N]) -> Self {
        let mut seq = Self::with_strategy_and_min_capacity(N);
        seq.extend(arr);
        seq
    }
}

impl<T: Clone> From<&[T]> for DynamicSequence<T> {
    fn from(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a DynamicSequence<T, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, R: ReserveStrategy> AsRef<[T]> for DynamicSequence<T, R> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs where
            T: PartialEq<U>
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self.as_slice()[..] == other[..] }
        }
    };
}

impl_slice_partial_eq! { [R: ReserveStrategy] DynamicSequence<T, R>, [U] }
impl_slice_partial_eq! { [R: ReserveStrategy] DynamicSequence<T, R>, &[U] }
impl_slice_partial_eq! { [R: ReserveStrategy] DynamicSequence<T, R>, Vec<U> }
impl_slice_partial_eq! { [R: ReserveStrategy, const N: usize] DynamicSequence<T, R>, [U; N] }

impl<T, U, R0: ReserveStrategy, R1: ReserveStrategy> PartialEq<DynamicSequence<U, R1>> for DynamicSequence<T, R0> where
    T: PartialEq<U>
{
    #[inline]
    fn eq(&self, other: &DynamicSequence<U, R1>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, R: ReserveStrategy> Eq for DynamicSequence<T, R> {}

impl<T: fmt::Debug, R: ReserveStrategy> fmt::Debug for DynamicSequence<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

/// Human readable listing of the elements, e.g. `[1, 2, 3]`
impl<T: fmt::Display, R: ReserveStrategy> fmt::Display for DynamicSequence<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, elem) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(elem, f)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests;

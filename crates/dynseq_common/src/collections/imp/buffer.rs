use core::{
    alloc::Layout,
    mem::MaybeUninit,
    ptr,
    slice,
};

use crate::collections::{reserve_failed, SequenceError};

/// Low level owner of the slots backing a sequence.
///
/// The buffer always holds exactly `capacity()` slots, of which the owner decides how many are initialized.
/// This type does not in anyway inspect the memory it manages. When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawBuffer` to track and drop the initialized prefix.
pub(crate) struct RawBuffer<T> {
    slots: Box<[MaybeUninit<T>]>,
}

impl<T> RawBuffer<T> {
    /// Creates a buffer with exactly `capacity` uninitialized slots.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceed `isize::MAX` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|err| reserve_failed(err))
    }

    /// Tries to create a buffer with exactly `capacity` uninitialized slots.
    ///
    /// The slots are never touched, so this does not scale with `capacity` (zero-sized `T` never allocates).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, SequenceError> {
        Layout::array::<T>(capacity).map_err(|_| SequenceError::CapacityOverflow)?;

        let mut slots = Vec::<MaybeUninit<T>>::with_capacity(capacity);
        // SAFETY: `MaybeUninit` does not need initialization, and `capacity` slots were just reserved
        unsafe { slots.set_len(capacity) };
        Ok(Self { slots: slots.into_boxed_slice() })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn as_ptr(&self) -> *const T {
        self.slots.as_ptr().cast()
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast()
    }

    /// # Safety
    ///
    /// The first `len` slots need to be initialized.
    #[inline]
    pub unsafe fn slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity());
        slice::from_raw_parts(self.as_ptr(), len)
    }

    /// # Safety
    ///
    /// The first `len` slots need to be initialized.
    #[inline]
    pub unsafe fn slice_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity());
        slice::from_raw_parts_mut(self.as_mut_ptr(), len)
    }

    /// Writes `value` into the slot at `index`, without dropping what was there.
    #[inline]
    pub fn write(&mut self, index: usize, value: T) {
        self.slots[index].write(value);
    }

    /// Moves the value out of the slot at `index`, leaving the slot logically uninitialized.
    ///
    /// # Safety
    ///
    /// The slot at `index` needs to be initialized, and must not be read again before being re-written.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        self.slots[index].assume_init_read()
    }

    /// Moves the initialized prefix of `len` elements into a new buffer of `new_capacity` slots.
    ///
    /// # Safety
    ///
    /// The first `len` slots need to be initialized and `len <= new_capacity`.
    pub unsafe fn grow_to(&mut self, new_capacity: usize, len: usize) -> Result<(), SequenceError> {
        debug_assert!(len <= self.capacity() && len <= new_capacity);

        let mut new_buf = Self::try_with_capacity(new_capacity)?;
        ptr::copy_nonoverlapping(self.as_ptr(), new_buf.as_mut_ptr(), len);
        // The old slots are now logically uninitialized, dropping the box only frees the memory
        self.slots = new_buf.slots;
        Ok(())
    }

    /// Shifts the elements in `[index, len)` one slot to the right, duplicating the `index`th element.
    ///
    /// # Safety
    ///
    /// The first `len` slots need to be initialized, `index <= len` and `len < capacity()`.
    /// The slot at `index` needs to be written before it is read again.
    pub unsafe fn shift_right(&mut self, index: usize, len: usize) {
        debug_assert!(index <= len && len < self.capacity());
        if index < len {
            let p = self.as_mut_ptr().add(index);
            ptr::copy(p, p.add(1), len - index);
        }
    }

    /// Shifts the elements in `(index, len)` one slot to the left, over writing the `index`th element.
    ///
    /// # Safety
    ///
    /// The first `len` slots need to be initialized and `index < len`.
    /// The `index`th element needs to have been moved out before, and slot `len - 1` is logically uninitialized afterwards.
    pub unsafe fn shift_left(&mut self, index: usize, len: usize) {
        debug_assert!(index < len && len <= self.capacity());
        let p = self.as_mut_ptr().add(index);
        ptr::copy(p.add(1), p, len - index - 1);
    }

    /// Drops the initialized prefix of `len` elements.
    ///
    /// # Safety
    ///
    /// The first `len` slots need to be initialized, and are logically uninitialized afterwards.
    pub unsafe fn drop_prefix(&mut self, len: usize) {
        ptr::drop_in_place(self.slice_mut(len));
    }
}

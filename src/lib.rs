//! A FIFO ring buffer with a fixed capacity.
//!
//! The capacity is chosen once, at construction, and the backing storage is
//! allocated exactly once. Elements are added at the back with `enqueue` and
//! removed from the front with `dequeue`; slots are reused through modular
//! index arithmetic, so nothing is ever shifted or reallocated.
//!
//! A full buffer never overwrites its oldest element: `enqueue` fails and
//! hands the element back instead. Every other fallible operation reports an
//! [`Error`], and a failed call leaves the buffer exactly as it was.
//!
//! # Feature Flags
//! The **ringfifo** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd. Without it the crate is `no_std` and only needs `alloc`.
//!
//! # Usage
//!
//! ```
//! use ringfifo::RingBuffer;
//!
//! let mut queue = RingBuffer::new(3)?;
//! queue.enqueue(1)?;
//! queue.enqueue(2)?;
//! queue.enqueue(3)?;
//! assert!(queue.is_full());
//!
//! assert_eq!(queue.dequeue()?, 1);
//! queue.enqueue(4)?;
//!
//! assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
//! assert_eq!(*queue.peek()?, 2);
//! assert_eq!(*queue.at(2)?, 4);
//! # Ok::<(), ringfifo::Error>(())
//! ```
//!
//! # Errors
//! ```
//! use ringfifo::{ErrorKind, RingBuffer};
//!
//! let mut queue = RingBuffer::new(1).unwrap();
//! queue.enqueue("a").unwrap();
//!
//! let rejected = queue.enqueue("b").unwrap_err();
//! assert_eq!(rejected.into_inner(), "b");
//!
//! assert_eq!(queue.discard(2).unwrap_err().kind(), ErrorKind::InvalidArgument);
//! assert_eq!(queue.at(-1).unwrap_err().kind(), ErrorKind::OutOfRange);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]

#[cfg(not(any(feature = "std", test)))]
extern crate core as std;

extern crate alloc;

use std::cmp;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Chain, FusedIterator};
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::slice;

use alloc::boxed::Box;
use alloc::vec::Vec;
use tracing::{debug, trace};

pub mod error;
mod utils;

pub use error::{CapacityError, Error, ErrorKind, InvalidArgument};
use utils::wrap_add;

/// A fixed capacity FIFO ring buffer.
///
/// The buffer keeps three cursors over its storage: `head` (slot of the
/// oldest element), `tail` (slot the next element is written to) and `len`
/// (number of live elements). `len` tells a full buffer apart from an empty
/// one, since both have `head == tail`.
///
/// The logical element at offset `i` lives in slot `(head + i) % capacity`.
pub struct RingBuffer<T> {
    xs: Box<[MaybeUninit<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        let len = self.len;
        self.remove_front(len);
    }
}

impl<T> RingBuffer<T> {
    /// Allocates `capacity` uninitialized slots; `capacity` is non-zero.
    fn allocate(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let mut xs = Vec::with_capacity(capacity);
        xs.resize_with(capacity, MaybeUninit::uninit);
        RingBuffer {
            xs: xs.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    fn wrap_add(&self, index: usize, addend: usize) -> usize {
        wrap_add(index, addend, self.xs.len())
    }

    #[inline]
    unsafe fn buffer_read(&mut self, slot: usize) -> T {
        self.xs.get_unchecked(slot).assume_init_read()
    }

    #[inline]
    unsafe fn buffer_ref(&self, slot: usize) -> &T {
        self.xs.get_unchecked(slot).assume_init_ref()
    }

    #[inline]
    unsafe fn buffer_mut(&mut self, slot: usize) -> &mut T {
        self.xs.get_unchecked_mut(slot).assume_init_mut()
    }

    /// Writes `element` at the tail. The caller has checked there is room.
    #[inline]
    fn push(&mut self, element: T) {
        debug_assert!(!self.is_full());
        let tail = self.tail;
        self.xs[tail].write(element);
        self.tail = self.wrap_add(tail, 1);
        self.len += 1;
    }

    /// Unlinks the `n` oldest elements, then drops them.
    ///
    /// The cursors are updated first: if a destructor panics, the remaining
    /// elements leak instead of being dropped twice.
    fn remove_front(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        let head = self.head;
        self.head = self.wrap_add(head, n);
        self.len -= n;

        if mem::needs_drop::<T>() {
            for offset in 0..n {
                let slot = self.wrap_add(head, offset);
                unsafe { self.xs[slot].assume_init_drop() }
            }
        }
    }
}

impl<T> RingBuffer<T> {
    /// Creates an empty `RingBuffer` able to hold `capacity` elements.
    ///
    /// Fails with [`InvalidArgument::ZeroCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let buf: RingBuffer<u8> = RingBuffer::new(16).unwrap();
    /// assert_eq!(buf.capacity(), 16);
    /// assert!(RingBuffer::<u8>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            debug!("rejected ring buffer with zero capacity");
            return Err(InvalidArgument::ZeroCapacity.into());
        }
        trace!(capacity, "allocating ring buffer");
        Ok(RingBuffer::allocate(capacity))
    }

    /// Appends an element at the back of the buffer.
    ///
    /// Fails if the buffer is full; the element is returned inside the
    /// [`CapacityError`] and the buffer is left untouched. The error converts
    /// into [`Error::Full`] with `?`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(2).unwrap();
    /// assert!(buf.enqueue(1).is_ok());
    /// assert!(buf.enqueue(2).is_ok());
    /// assert_eq!(buf.enqueue(3).unwrap_err().element, 3);
    /// ```
    pub fn enqueue(&mut self, element: T) -> Result<(), CapacityError<T>> {
        if self.is_full() {
            debug!(capacity = self.capacity(), "enqueue rejected, ring buffer is full");
            return Err(CapacityError::new(element));
        }
        self.push(element);
        Ok(())
    }

    /// Removes the oldest element and returns it.
    ///
    /// Fails with [`Error::Empty`] if there is nothing to remove.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Error, RingBuffer};
    ///
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.enqueue(1).unwrap();
    /// buf.enqueue(2).unwrap();
    ///
    /// assert_eq!(buf.dequeue(), Ok(1));
    /// assert_eq!(buf.dequeue(), Ok(2));
    /// assert_eq!(buf.dequeue(), Err(Error::Empty));
    /// ```
    pub fn dequeue(&mut self) -> Result<T, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let head = self.head;
        self.head = self.wrap_add(head, 1);
        self.len -= 1;
        Ok(unsafe { self.buffer_read(head) })
    }

    /// Removes the `n` oldest elements without returning them.
    ///
    /// Equivalent to `n` calls to `dequeue` with the results dropped, but the
    /// cursors move in one step. Fails with
    /// [`InvalidArgument::DiscardExceedsLen`] if `n` is larger than `len()`,
    /// in which case nothing is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(4).unwrap();
    /// for i in 0..4 {
    ///     buf.enqueue(i).unwrap();
    /// }
    /// buf.discard(3).unwrap();
    /// assert_eq!(buf.len(), 1);
    /// assert_eq!(buf.dequeue(), Ok(3));
    /// assert!(buf.discard(1).is_err());
    /// ```
    pub fn discard(&mut self, n: usize) -> Result<(), Error> {
        if n > self.len {
            debug!(requested = n, len = self.len, "discard rejected");
            return Err(InvalidArgument::DiscardExceedsLen {
                requested: n,
                len: self.len,
            }
            .into());
        }
        self.remove_front(n);
        trace!(discarded = n, remaining = self.len, "discarded oldest elements");
        Ok(())
    }

    /// Removes every element and rewinds the cursors to slot zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(4).unwrap();
    /// buf.enqueue(1).unwrap();
    /// buf.clear();
    /// assert!(buf.is_empty());
    /// ```
    pub fn clear(&mut self) {
        let len = self.len;
        self.remove_front(len);
        self.head = 0;
        self.tail = 0;
        trace!(dropped = len, "ring buffer cleared");
    }

    /// Returns a reference to the oldest element.
    ///
    /// Fails with [`Error::Empty`] if the buffer holds nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Error, RingBuffer};
    ///
    /// let mut buf = RingBuffer::new(10).unwrap();
    /// assert_eq!(buf.peek(), Err(Error::Empty));
    ///
    /// buf.enqueue(-42).unwrap();
    /// buf.enqueue(0).unwrap();
    /// assert_eq!(buf.peek(), Ok(&-42));
    /// assert_eq!(buf.len(), 2);
    /// ```
    pub fn peek(&self) -> Result<&T, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        Ok(unsafe { self.buffer_ref(self.head) })
    }

    /// Returns a mutable reference to the oldest element.
    ///
    /// Fails with [`Error::Empty`] if the buffer holds nothing.
    pub fn peek_mut(&mut self) -> Result<&mut T, Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let head = self.head;
        Ok(unsafe { self.buffer_mut(head) })
    }

    /// Returns a reference to the element `offset` places after the oldest.
    ///
    /// `peek_at(0)` is the oldest element. Fails with [`Error::OutOfRange`]
    /// unless `offset < len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(10).unwrap();
    /// buf.enqueue(-42).unwrap();
    /// buf.enqueue(0).unwrap();
    /// buf.enqueue(99).unwrap();
    ///
    /// assert_eq!(buf.peek_at(2), Ok(&99));
    /// assert!(buf.peek_at(3).is_err());
    /// ```
    pub fn peek_at(&self, offset: usize) -> Result<&T, Error> {
        self.get(offset).ok_or(Error::OutOfRange { len: self.len })
    }

    /// Signed variant of [`peek_at`](RingBuffer::peek_at).
    ///
    /// Negative indices fail with [`Error::OutOfRange`], the same as indices
    /// past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::{Error, RingBuffer};
    ///
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.enqueue('a').unwrap();
    /// buf.enqueue('b').unwrap();
    ///
    /// assert_eq!(buf.at(1), Ok(&'b'));
    /// assert_eq!(buf.at(-1), Err(Error::OutOfRange { len: 2 }));
    /// assert_eq!(buf.at(2), Err(Error::OutOfRange { len: 2 }));
    /// ```
    pub fn at(&self, index: isize) -> Result<&T, Error> {
        match usize::try_from(index) {
            Ok(offset) => self.peek_at(offset),
            Err(_) => Err(Error::OutOfRange { len: self.len }),
        }
    }

    /// Returns a reference to the element at logical `offset`, or `None` if
    /// it is out of range.
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset < self.len {
            let slot = self.wrap_add(self.head, offset);
            unsafe { Some(self.buffer_ref(slot)) }
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at logical `offset`, or
    /// `None` if it is out of range.
    pub fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        if offset < self.len {
            let slot = self.wrap_add(self.head, offset);
            unsafe { Some(self.buffer_mut(slot)) }
        } else {
            None
        }
    }

    /// Returns the number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.xs.len()
    }

    /// Returns the number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the buffer holds `capacity()` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(1).unwrap();
    /// assert!(!buf.is_full());
    /// buf.enqueue(1).unwrap();
    /// assert!(buf.is_full());
    /// ```
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns an oldest-to-newest iterator.
    ///
    /// Each call starts over from the current oldest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.enqueue(5).unwrap();
    /// buf.enqueue(3).unwrap();
    /// buf.enqueue(4).unwrap();
    /// let b: &[_] = &[&5, &3, &4];
    /// let c: Vec<&i32> = buf.iter().collect();
    /// assert_eq!(&c[..], b);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: &self.xs,
            head: self.head,
            remaining: self.len,
        }
    }

    /// Returns an oldest-to-newest iterator over mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.enqueue(5).unwrap();
    /// buf.enqueue(3).unwrap();
    /// for num in buf.iter_mut() {
    ///     *num -= 2;
    /// }
    /// assert_eq!(buf.iter().collect::<Vec<_>>(), vec![&3, &1]);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (first, second) = self.as_mut_slices();
        IterMut {
            inner: first.iter_mut().chain(second.iter_mut()),
        }
    }

    /// Returns the live elements as a pair of slices, oldest part first.
    ///
    /// The second slice is empty unless the elements wrap past the end of the
    /// storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringfifo::RingBuffer;
    ///
    /// let mut buf = RingBuffer::new(3).unwrap();
    /// buf.enqueue(1).unwrap();
    /// buf.enqueue(2).unwrap();
    /// buf.enqueue(3).unwrap();
    /// assert_eq!(buf.as_slices(), (&[1, 2, 3][..], &[][..]));
    ///
    /// buf.dequeue().unwrap();
    /// buf.enqueue(4).unwrap();
    /// assert_eq!(buf.as_slices(), (&[2, 3][..], &[4][..]));
    /// ```
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (first_len, second_len) = self.split_lens();
        unsafe {
            let ptr = self.xs.as_ptr() as *const T;
            (
                slice::from_raw_parts(ptr.add(self.head), first_len),
                slice::from_raw_parts(ptr, second_len),
            )
        }
    }

    /// Returns the live elements as a pair of mutable slices, oldest part
    /// first.
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (first_len, second_len) = self.split_lens();
        let head = self.head;
        unsafe {
            let ptr = self.xs.as_mut_ptr() as *mut T;
            (
                slice::from_raw_parts_mut(ptr.add(head), first_len),
                slice::from_raw_parts_mut(ptr, second_len),
            )
        }
    }

    /// Lengths of the live run before and after the end of the storage.
    #[inline]
    fn split_lens(&self) -> (usize, usize) {
        let first_len = cmp::min(self.len, self.capacity() - self.head);
        (first_len, self.len - first_len)
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        let mut cloned = RingBuffer::allocate(self.capacity());
        for element in self {
            cloned.push(element.clone());
        }
        cloned
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    /// Two buffers are equal when they hold equal elements in the same order,
    /// whatever their capacities or physical layout.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

impl<T: Hash> Hash for RingBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len;
        match self.get(index) {
            Some(element) => element,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                len, index
            ),
        }
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RingBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

/// `RingBuffer` iterator
///
/// Walks the storage from the buffer's head at the time `iter()` was called,
/// for exactly as many steps as there were live elements.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    ring: &'a [MaybeUninit<T>],
    head: usize,
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            ring: self.ring,
            head: self.head,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.head;
        self.head = wrap_add(self.head, 1, self.ring.len());
        self.remaining -= 1;
        unsafe { Some(self.ring.get_unchecked(slot).assume_init_ref()) }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let slot = wrap_add(self.head, self.remaining, self.ring.len());
        unsafe { Some(self.ring.get_unchecked(slot).assume_init_ref()) }
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

/// `RingBuffer` mutable iterator
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    inner: Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// By-value `RingBuffer` iterator
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    inner: RingBuffer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.dequeue().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

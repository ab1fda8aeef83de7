//! Error types for `RingBuffer`.

use std::fmt;

use thiserror::Error;

/// Error returned by fallible `RingBuffer` operations.
///
/// A failed operation never mutates the buffer.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// An argument was rejected before any state changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    /// The buffer already holds `capacity` elements.
    #[error("ring buffer is full")]
    Full,

    /// The buffer holds no elements.
    #[error("ring buffer is empty")]
    Empty,

    /// A logical offset was negative or not below the number of live elements.
    #[error("index out of range for ring buffer of length {len}")]
    OutOfRange {
        /// Number of live elements at the time of the call.
        len: usize,
    },
}

/// Reasons an argument is rejected.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidArgument {
    /// A ring buffer needs at least one slot.
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// `discard` asked for more elements than the buffer holds.
    #[error("cannot discard {requested} elements from ring buffer of length {len}")]
    DiscardExceedsLen {
        /// Number of elements the caller asked to discard.
        requested: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
    /// See [`Error::Full`].
    Full,
    /// See [`Error::Empty`].
    Empty,
    /// See [`Error::OutOfRange`].
    OutOfRange,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Full => ErrorKind::Full,
            Error::Empty => ErrorKind::Empty,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

/// Error value indicating insufficient capacity.
///
/// Returned by `RingBuffer::enqueue` together with the element that did not
/// fit, so the caller keeps ownership of it. Converts into [`Error::Full`].
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub struct CapacityError<T = ()> {
    /// The element that caused the error.
    pub element: T,
}

const CAPERROR: &str = "insufficient capacity";

impl<T> CapacityError<T> {
    /// Creates a new `CapacityError` holding `element`.
    pub const fn new(element: T) -> CapacityError<T> {
        CapacityError { element }
    }

    /// Extracts the element that caused the error.
    pub fn into_inner(self) -> T {
        self.element
    }

    /// Drops the element, keeping only the error.
    pub fn simplify(self) -> CapacityError {
        CapacityError { element: () }
    }
}

impl<T> From<CapacityError<T>> for Error {
    fn from(_: CapacityError<T>) -> Error {
        Error::Full
    }
}

impl<T> std::error::Error for CapacityError<T> {}

impl<T> fmt::Display for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", CAPERROR)
    }
}

impl<T> fmt::Debug for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", "CapacityError", CAPERROR)
    }
}

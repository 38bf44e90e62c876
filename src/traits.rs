//! Common traits and the error type for heap operations
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait with a `BinaryHeap`-like API (`push`, `peek`, `pop`, `merge`)
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based insertion and `decrease_key`
//!
//! [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) implements both, and also
//! exposes a richer inherent API with checked errors.

use std::fmt;

/// Error type for heap operations
///
/// Every operation that can fail validates its inputs before mutating the
/// heap, so an `Err` always leaves the heap exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The new priority is not less than the current priority
    PriorityNotDecreased,
    /// The handle is no longer valid (element was removed)
    InvalidHandle,
    /// The operation needs at least one element
    EmptyHeap,
    /// A decrease-key amount was negative
    NegativeDelta { delta: i64 },
    /// Key arithmetic would leave the range of `i64`
    KeyOverflow,
    /// The operation needs a heap made of exactly one tree
    NotSingleTree { roots: usize },
    /// More elements were requested than the heap holds
    KOutOfRange { k: usize, len: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::PriorityNotDecreased => {
                write!(f, "new priority is not less than current priority")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::NegativeDelta { delta } => {
                write!(f, "decrease amount must be non-negative, got {delta}")
            }
            HeapError::KeyOverflow => write!(f, "key arithmetic overflowed i64"),
            HeapError::NotSingleTree { roots } => {
                write!(f, "heap must consist of a single tree, found {roots} roots")
            }
            HeapError::KOutOfRange { k, len } => {
                write!(f, "requested {k} elements from a heap of {len}")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for decrease_key operations
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (priority, item) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::Heap;
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::{Heap, DecreaseKeyHeap};
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Lowers the priority of the element identified by the handle to `new_priority`
    ///
    /// # Errors
    /// Returns `HeapError::PriorityNotDecreased` if the new priority is not
    /// less than the current priority, and `HeapError::InvalidHandle` if the
    /// element was already removed.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;
}

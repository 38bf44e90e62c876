//! The k smallest keys of a single-tree heap.
//!
//! A heap-ordered tree is itself a priority-ordered search space: the smallest
//! key is the root, and the next smallest is always a child of a node already
//! taken. An auxiliary [`FibonacciHeap`] holds the frontier. Each entry's
//! payload is a reference to the node it was copied from, so popping an entry
//! tells us which children to push next.
//!
//! The auxiliary heap only sees inserts (O(1)) and delete-mins, so the whole
//! extraction costs O(k · Δ) where Δ is the maximum rank in the tree, and the
//! source heap is never modified.

use crate::fibonacci::{FibonacciHeap, Key};
use crate::node::{self, key_of, Link};
use crate::traits::HeapError;

/// Returns the `k` smallest keys of `heap` in non-decreasing order.
///
/// # Errors
/// - [`HeapError::NotSingleTree`] if the heap has zero or several roots
/// - [`HeapError::KOutOfRange`] if `k` exceeds the number of elements
///
/// `k == 0` always succeeds with an empty vector.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
/// use rust_fibonacci_heap::k_smallest::k_smallest;
///
/// let mut heap = FibonacciHeap::new();
/// for key in [0, 4, 2, 3, 1, 7, 6, 5, 8] {
///     heap.insert_key(key);
/// }
/// // Removing 0 consolidates the other eight keys into one tree.
/// heap.delete_min().unwrap();
/// assert_eq!(heap.root_count(), 1);
/// assert_eq!(k_smallest(&heap, 4), Ok(vec![1, 2, 3, 4]));
/// ```
pub fn k_smallest<T>(heap: &FibonacciHeap<T>, k: usize) -> Result<Vec<Key>, HeapError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let root = match heap.first_root() {
        Some(root) if heap.root_count() == 1 => root,
        _ => {
            return Err(HeapError::NotSingleTree {
                roots: heap.root_count(),
            })
        }
    };
    if k > heap.len() {
        return Err(HeapError::KOutOfRange { k, len: heap.len() });
    }

    let mut frontier: FibonacciHeap<Link<T>> = FibonacciHeap::new();
    frontier.insert(key_of(root), root.clone());

    let mut out = Vec::with_capacity(k);
    while out.len() < k {
        let (key, origin) = frontier.delete_min()?;
        out.push(key);
        let child = node::first_child(&origin);
        for c in node::ring(child.as_ref()) {
            frontier.insert(key_of(&c), c);
        }
    }
    Ok(out)
}

//! Fibonacci Heap for Rust
//!
//! This crate provides a Fibonacci heap over `i64` keys with an optional
//! payload per element, and handles that support `decrease_key` and `delete`
//! of arbitrary elements.
//!
//! # Complexity
//!
//! | Operation         | Cost                 |
//! |-------------------|----------------------|
//! | `insert`          | O(1)                 |
//! | `find_min`        | O(1)                 |
//! | `meld`            | O(1)                 |
//! | `decrease_key_by` | O(1) amortized       |
//! | `delete_min`      | O(log n) amortized   |
//! | `delete`          | O(log n) amortized   |
//! | `k_smallest`      | O(k · max rank)      |
//!
//! Link and cut operations are counted per heap ([`FibonacciHeap::stats`])
//! and for the whole process ([`counters::total_links`],
//! [`counters::total_cuts`]).
//!
//! # Example
//!
//! ```rust
//! use rust_fibonacci_heap::fibonacci::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! let _handle2 = heap.insert(3, "item2");
//! heap.decrease_key_by(&handle1, 4).unwrap();
//! assert_eq!(heap.peek(), Some((&1, &"item1")));
//! ```
//!
//! # Features
//!
//! - `debug-invariants`: run the full structure check after every mutating
//!   operation in debug builds. Exercise it with
//!   `cargo test --features debug-invariants`.
//!
//! [`FibonacciHeap::stats`]: fibonacci::FibonacciHeap::stats

pub mod counters;
pub mod fibonacci;
pub mod k_smallest;
mod node;
pub mod rank;
mod storage;
pub mod traits;

pub use counters::{total_cuts, total_links, HeapStats};
pub use fibonacci::{FibonacciHandle, FibonacciHeap, Key};
pub use k_smallest::k_smallest;
pub use traits::{DecreaseKeyHeap, Handle, Heap, HeapError};

//! Link and cut accounting.
//!
//! Two levels of counters are kept:
//!
//! - **Process-wide** totals ([`total_links`], [`total_cuts`]) shared by every
//!   [`FibonacciHeap`](crate::fibonacci::FibonacciHeap) in the process. They
//!   only ever grow and are never reset. Tests that run heaps in parallel must
//!   compare deltas or use lower bounds, never exact values.
//! - **Per-heap** [`HeapStats`], owned by one heap and summed on merge, for
//!   auditing a single instance in isolation.
//!
//! The heap itself is single-threaded. The totals are atomics only so that a
//! shared static is sound; `Relaxed` ordering is sufficient because no other
//! memory is published through them.

use std::sync::atomic::{AtomicU64, Ordering};

static TOTAL_LINKS: AtomicU64 = AtomicU64::new(0);
static TOTAL_CUTS: AtomicU64 = AtomicU64::new(0);

/// Total number of link operations performed by all heaps in this process.
///
/// A link hangs the larger-keyed of two equal-rank roots under the other
/// during consolidation.
pub fn total_links() -> u64 {
    TOTAL_LINKS.load(Ordering::Relaxed)
}

/// Total number of cut operations performed by all heaps in this process.
///
/// A cut detaches a node from its parent and moves it to the root list,
/// whether directly from a decrease-key or as part of a cascade.
pub fn total_cuts() -> u64 {
    TOTAL_CUTS.load(Ordering::Relaxed)
}

/// Snapshot of both process-wide totals.
pub fn totals() -> HeapStats {
    HeapStats {
        links: total_links(),
        cuts: total_cuts(),
    }
}

/// Link and cut counts for one heap (or a snapshot of the process totals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub links: u64,
    pub cuts: u64,
}

impl HeapStats {
    /// Counts accumulated since an `earlier` snapshot of the same source.
    ///
    /// ```rust
    /// use rust_fibonacci_heap::counters::HeapStats;
    ///
    /// let before = HeapStats { links: 3, cuts: 1 };
    /// let after = HeapStats { links: 10, cuts: 4 };
    /// assert_eq!(after.since(&before), HeapStats { links: 7, cuts: 3 });
    /// ```
    pub fn since(&self, earlier: &HeapStats) -> HeapStats {
        HeapStats {
            links: self.links.saturating_sub(earlier.links),
            cuts: self.cuts.saturating_sub(earlier.cuts),
        }
    }

    pub(crate) fn record_link(&mut self) {
        self.links += 1;
        TOTAL_LINKS.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cut(&mut self) {
        self.cuts += 1;
        TOTAL_CUTS.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn absorb(&mut self, other: HeapStats) {
        self.links += other.links;
        self.cuts += other.cuts;
    }
}

//! Rank type and helpers for node degree bookkeeping.
//!
//! # Why u8?
//!
//! The rank of a node is its number of direct children. In a Fibonacci heap a
//! tree whose root has rank `k` holds at least `F(k+2)` nodes, where `F` is the
//! Fibonacci sequence, so the largest possible rank is `floor(log_φ(n))`.
//! Even for `n = usize::MAX` that is below 93, so a `u8` is plenty and keeps
//! the node record small.
//!
//! # Runtime Checks
//!
//! [`checked_increment`] panics if a rank would overflow. That can only happen
//! if the heap structure is already corrupt.

/// Type alias for node rank.
pub type Rank = u8;

/// Maximum representable rank.
pub const MAX_RANK: Rank = u8::MAX;

/// The golden ratio φ, the growth rate bounding tree sizes by rank.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Increment a rank, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`.
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: a Fibonacci tree of rank 255 would need more than \
         usize::MAX nodes",
    )
}

/// Decrement a rank, saturating at 0.
///
/// ```rust
/// use rust_fibonacci_heap::rank::saturating_decrement;
///
/// assert_eq!(saturating_decrement(5), 4);
/// assert_eq!(saturating_decrement(0), 0);
/// ```
#[inline]
pub fn saturating_decrement(rank: Rank) -> Rank {
    rank.saturating_sub(1)
}

/// Upper bound on the rank of any tree in a heap holding `len` nodes:
/// `floor(log_φ(len))`. Returns 0 for `len <= 1`.
///
/// ```rust
/// use rust_fibonacci_heap::rank::max_rank_bound;
///
/// assert_eq!(max_rank_bound(1), 0);
/// assert_eq!(max_rank_bound(2), 1);
/// assert_eq!(max_rank_bound(1000), 14);
/// ```
pub fn max_rank_bound(len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    ((len as f64).ln() / GOLDEN_RATIO.ln()).floor() as usize
}

/// Number of slots the consolidation table needs for `len` nodes.
///
/// One more than strictly required, so a rank equal to the bound still has a
/// slot above it when a link cascades.
#[inline]
pub fn consolidation_slots(len: usize) -> usize {
    max_rank_bound(len) + 2
}

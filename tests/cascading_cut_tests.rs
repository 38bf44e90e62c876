//! Cut and cascading-cut behaviour on a known tree shape.
//!
//! Inserting 0..=16 and removing 0 consolidates the remaining sixteen keys
//! into a single binomial tree of rank 4:
//!
//! ```text
//! 1
//! ├── 2
//! ├── 3 ── 4
//! ├── 5 ┬─ 6
//! │     └─ 7 ── 8
//! └── 9 ┬─ 10
//!       ├─ 11 ── 12
//!       └─ 13 ┬─ 14
//!             └─ 15 ── 16
//! ```

use rust_fibonacci_heap::counters;
use rust_fibonacci_heap::fibonacci::{FibonacciHandle, FibonacciHeap};

fn rank4_tree() -> (FibonacciHeap<()>, Vec<FibonacciHandle<()>>) {
    let mut heap = FibonacciHeap::new();
    let handles: Vec<_> = (0..=16).map(|k| heap.insert_key(k)).collect();
    heap.delete_min().unwrap();
    assert_eq!(heap.counters_rep(), vec![0, 0, 0, 0, 1]);
    assert_eq!(heap.marked_count(), 0);
    (heap, handles)
}

#[test]
fn test_cut_marks_unmarked_parent() {
    let (mut heap, h) = rank4_tree();
    heap.decrease_key_by(&h[10], 2).unwrap();

    assert_eq!(heap.root_count(), 2);
    assert_eq!(heap.marked_count(), 1);
    assert_eq!(heap.stats().cuts, 1);
    assert_eq!(heap.min_key(), Some(1));
    assert!(heap.verify_internal_structure());
}

#[test]
fn test_cut_below_root_does_not_mark() {
    let (mut heap, h) = rank4_tree();
    heap.decrease_key_by(&h[2], 2).unwrap();

    assert_eq!(heap.root_count(), 2);
    assert_eq!(heap.marked_count(), 0);
    assert_eq!(heap.find_min(), Some(h[2].clone()));
    assert_eq!(heap.min_key(), Some(0));
}

#[test]
fn test_no_cut_when_order_holds() {
    let (mut heap, h) = rank4_tree();
    // 16 -> 15 equals its parent's key, which still satisfies heap order.
    heap.decrease_key_by(&h[16], 1).unwrap();
    heap.decrease_key_by(&h[12], 0).unwrap();

    assert_eq!(heap.root_count(), 1);
    assert_eq!(heap.stats().cuts, 0);
    assert!(heap.verify_internal_structure());
}

#[test]
fn test_cascade_through_two_marked_ancestors() {
    let (mut heap, h) = rank4_tree();

    // Mark 9 by cutting 10, and 13 by cutting 14.
    heap.decrease_key_by(&h[10], 2).unwrap();
    heap.decrease_key_by(&h[14], 2).unwrap();
    assert_eq!(heap.root_count(), 3);
    assert_eq!(heap.marked_count(), 2);
    assert_eq!(heap.potential(), 7);

    let before_global = counters::totals();
    let before_local = heap.stats();

    // Cutting 15 from the marked 13 cascades: 13 is cut from the marked 9,
    // 9 is cut from the root 1, and the cascade stops there.
    heap.decrease_key_by(&h[15], 3).unwrap();

    assert_eq!(heap.root_count(), 6);
    assert_eq!(heap.marked_count(), 0);
    assert_eq!(heap.potential(), 6);
    assert_eq!(heap.stats().since(&before_local).cuts, 3);
    assert!(counters::totals().since(&before_global).cuts >= 3);

    // Roots now: 1 (rank 3), 9 {11} (rank 1), 15 {16} (rank 1), 10, 13, 14.
    assert_eq!(heap.counters_rep(), vec![3, 2, 0, 1]);
    assert_eq!(heap.potential(), heap.recount_potential());
    assert!(heap.verify_internal_structure());

    let mut drained = Vec::new();
    while let Ok((key, ())) = heap.delete_min() {
        drained.push(key);
    }
    assert_eq!(
        drained,
        vec![1, 2, 3, 4, 5, 6, 7, 8, 8, 9, 11, 12, 12, 12, 13, 16]
    );
}

#[test]
fn test_cascade_stops_at_unmarked_ancestor() {
    let (mut heap, h) = rank4_tree();

    // Mark 13 only, then cut 15: 13 is cut, and 9 (unmarked) becomes marked.
    heap.decrease_key_by(&h[14], 2).unwrap();
    assert_eq!(heap.marked_count(), 1);

    heap.decrease_key_by(&h[15], 3).unwrap();
    assert_eq!(heap.root_count(), 4);
    assert_eq!(heap.marked_count(), 1);
    assert_eq!(heap.stats().cuts, 3);
    assert!(heap.verify_internal_structure());
}

#[test]
fn test_delete_min_unmarks_promoted_children() {
    let (mut heap, h) = rank4_tree();
    // Cut 6 from 5: marks 5, a direct child of the root 1.
    heap.decrease_key_by(&h[6], 2).unwrap();
    assert_eq!(heap.marked_count(), 1);

    // Removing 1 promotes 5 to a root, which clears its mark.
    assert_eq!(heap.delete_min(), Ok((1, ())));
    assert_eq!(heap.marked_count(), 0);
    assert_eq!(heap.potential(), heap.recount_potential());
    assert!(heap.verify_internal_structure());
}

#[test]
fn test_delete_inner_node_moves_children_up() {
    let (mut heap, h) = rank4_tree();
    let before = heap.stats().cuts;
    assert_eq!(heap.delete(&h[13]), Ok((13, ())));
    assert_eq!(heap.stats().cuts, before + 1);
    assert_eq!(heap.len(), 15);
    assert!(h[14].is_live() && h[15].is_live() && h[16].is_live());
    assert!(heap.verify_internal_structure());

    let mut drained = Vec::new();
    while let Ok((key, ())) = heap.delete_min() {
        drained.push(key);
    }
    let expected: Vec<i64> = (1..=16).filter(|&k| k != 13).collect();
    assert_eq!(drained, expected);
}

//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert, find_min and meld
//! - O(1) amortized decrease_key
//! - O(log n) amortized delete_min and delete
//!
//! The structure is a forest of heap-ordered trees. The roots are linked in a
//! circular doubly linked list (the root list), and the children of every node
//! form another such list. The heap keeps a pointer to the minimum root.
//!
//! # Laziness
//!
//! `insert` and `meld` only splice root lists. All restructuring is deferred
//! to `delete_min`, which links equal-rank roots until every root has a
//! distinct rank ("consolidation"). `decrease_key` cuts a node that violates
//! heap order to the root list; a parent that loses a second child is cut as
//! well ("cascading cuts"), which bounds tree sizes so that ranks stay
//! `O(log n)`.
//!
//! # Potential
//!
//! The amortized bounds follow from the potential `Φ = roots + 2·marked`.
//! Both counts are maintained incrementally; [`FibonacciHeap::potential`] is
//! O(1).
//!
//! # Handles
//!
//! [`FibonacciHeap::insert`] returns a [`FibonacciHandle`], a non-owning
//! reference to the element. Once the element is removed the handle is stale
//! and every operation taking it returns [`HeapError::InvalidHandle`].
//! A handle belongs to the heap that issued it, and after a meld to the heap
//! that absorbed it. Presenting it to any other heap is rejected with
//! [`HeapError::InvalidHandle`] as well.

use crate::counters::HeapStats;
use crate::node::{self, key_of, Link, Node, WeakLink};
use crate::rank::{self, checked_increment, saturating_decrement};
use crate::storage::{NodeRef, OwnerToken, WeakNodeRef};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use smallvec::SmallVec;
use std::fmt;

/// Key type of every element.
pub type Key = i64;

/// Handle to an element in a Fibonacci heap
///
/// Cloning a handle is cheap and all clones refer to the same element.
pub struct FibonacciHandle<T> {
    node: WeakLink<T>,
}

impl<T> FibonacciHandle<T> {
    /// Current key of the element, or `None` once it has been removed.
    pub fn key(&self) -> Option<Key> {
        self.node.upgrade().map(|n| key_of(&n))
    }

    /// True while the element is still in a heap.
    pub fn is_live(&self) -> bool {
        !self.node.is_dangling()
    }

    fn upgrade(&self) -> Result<Link<T>, HeapError> {
        self.node.upgrade().ok_or(HeapError::InvalidHandle)
    }
}

impl<T> Clone for FibonacciHandle<T> {
    fn clone(&self) -> Self {
        FibonacciHandle {
            node: self.node.clone(),
        }
    }
}

impl<T> PartialEq for FibonacciHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<T> Eq for FibonacciHandle<T> {}

impl<T> fmt::Debug for FibonacciHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHandle")
            .field("key", &self.key())
            .finish()
    }
}

impl<T> Handle for FibonacciHandle<T> {}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use rust_fibonacci_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key_by(&handle, 4).unwrap();
/// assert_eq!(heap.peek(), Some((&1, &"item")));
/// assert_eq!(heap.delete_min(), Ok((1, "item")));
/// ```
pub struct FibonacciHeap<T = ()> {
    /// Entry point of the root list.
    first: Option<Link<T>>,
    min: Option<Link<T>>,
    len: usize,
    roots: usize,
    marked: usize,
    stats: HeapStats,
    owner: OwnerToken,
}

impl<T> FibonacciHeap<T> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        FibonacciHeap {
            first: None,
            min: None,
            len: 0,
            roots: 0,
            marked: 0,
            stats: HeapStats::default(),
            owner: OwnerToken::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of trees in the root list.
    pub fn root_count(&self) -> usize {
        self.roots
    }

    /// Number of marked nodes.
    pub fn marked_count(&self) -> usize {
        self.marked
    }

    /// Links and cuts performed by this heap, including heaps melded into it.
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// `roots + 2 * marked`.
    pub fn potential(&self) -> usize {
        self.roots + 2 * self.marked
    }

    /// Inserts `key` with payload `item` as a new single-node tree.
    ///
    /// **Time Complexity**: O(1) worst case
    pub fn insert(&mut self, key: Key, item: T) -> FibonacciHandle<T> {
        let node = NodeRef::new(Node::new(key, item, self.owner.clone()));
        if let Some(first) = &self.first {
            node::link_before(&node, first);
        }
        self.first = Some(node.clone());
        self.update_min(&node);
        self.len += 1;
        self.roots += 1;
        self.check();
        FibonacciHandle {
            node: node.downgrade(),
        }
    }

    /// Handle to the minimum element, or `None` if the heap is empty.
    pub fn find_min(&self) -> Option<FibonacciHandle<T>> {
        self.min.as_ref().map(|min| FibonacciHandle {
            node: min.downgrade(),
        })
    }

    pub fn min_key(&self) -> Option<Key> {
        self.min.as_ref().map(key_of)
    }

    /// Minimum key and payload without removing them.
    pub fn peek(&self) -> Option<(&Key, &T)> {
        self.min.as_ref().map(|min| {
            // SAFETY: We bypass RefCell's dynamic borrow checking to return
            // references with lifetime tied to `&self`. This is sound because:
            // 1. The Rc in `self.min` keeps the node alive for `&self`'s lifetime
            // 2. A node's key and item are only written by `&mut self` methods
            //    of the heap that owns it (`resolve` rejects handles from other
            //    heaps), and the borrow checker rules those out while these
            //    references exist
            unsafe {
                let ptr = min.as_ptr();
                (&(*ptr).key, &(*ptr).item)
            }
        })
    }

    /// Current key of the element behind `handle`.
    pub fn key_of(&self, handle: &FibonacciHandle<T>) -> Result<Key, HeapError> {
        self.resolve(handle).map(|node| key_of(&node))
    }

    /// Removes and returns the minimum element
    ///
    /// **Time Complexity**: O(log n) amortized, O(n) worst case
    ///
    /// The children of the minimum take its place in the root list, unmarked,
    /// and the root list is then consolidated.
    pub fn delete_min(&mut self) -> Result<(Key, T), HeapError> {
        let min = self.min.take().ok_or(HeapError::EmptyHeap)?;
        let was_sole_root = node::is_solitary(&min);
        let was_first = self.first.as_ref().is_some_and(|f| f.ptr_eq(&min));
        let children = min.borrow_mut().child.take();

        if let Some(child) = children {
            for c in node::siblings(&child) {
                let mut n = c.borrow_mut();
                n.parent = WeakNodeRef::empty();
                if n.marked {
                    n.marked = false;
                    self.marked -= 1;
                }
                self.roots += 1;
            }
            if !was_sole_root {
                node::splice_before(&child, &min);
                node::unlink(&min);
            }
            if was_first {
                self.first = Some(child);
            }
        } else if was_sole_root {
            self.first = None;
        } else {
            let after = node::next(&min);
            node::unlink(&min);
            if was_first {
                self.first = Some(after);
            }
        }

        {
            let mut n = min.borrow_mut();
            n.rank = 0;
        }
        self.roots -= 1;
        self.len -= 1;
        if !self.is_empty() {
            self.consolidate();
        }
        self.check();

        // Handles are weak and every structural link to `min` is gone, so
        // this is the last strong reference.
        let removed = min
            .into_inner()
            .expect("removed node must not be shared after unlinking");
        Ok((removed.key, removed.item))
    }

    /// Subtracts `delta` from the key of the element behind `handle`.
    ///
    /// **Time Complexity**: O(1) amortized
    ///
    /// If the node ends up smaller than its parent it is cut to the root list,
    /// and marked ancestors are cut after it.
    ///
    /// # Errors
    /// - [`HeapError::NegativeDelta`] if `delta < 0`
    /// - [`HeapError::InvalidHandle`] if the element was removed or belongs
    ///   to another heap
    /// - [`HeapError::KeyOverflow`] if the new key is below `i64::MIN`
    pub fn decrease_key_by(
        &mut self,
        handle: &FibonacciHandle<T>,
        delta: Key,
    ) -> Result<(), HeapError> {
        if delta < 0 {
            return Err(HeapError::NegativeDelta { delta });
        }
        let node = self.resolve(handle)?;
        let new_key = key_of(&node)
            .checked_sub(delta)
            .ok_or(HeapError::KeyOverflow)?;

        node.borrow_mut().key = new_key;
        self.update_min(&node);
        if let Some(parent) = node::parent(&node) {
            if new_key < key_of(&parent) {
                self.cascading_cut(node, parent);
            }
        }
        self.check();
        Ok(())
    }

    /// Removes the element behind `handle` and returns its key and payload.
    ///
    /// **Time Complexity**: O(log n) amortized
    ///
    /// Has the effect of decreasing the key below every other key and then
    /// calling [`delete_min`](Self::delete_min), without touching the key: a
    /// non-root is cut (cascading as usual) and then treated as the minimum.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was already removed or
    ///   belongs to another heap
    pub fn delete(&mut self, handle: &FibonacciHandle<T>) -> Result<(Key, T), HeapError> {
        let node = self.resolve(handle)?;
        if let Some(parent) = node::parent(&node) {
            self.cascading_cut(node.clone(), parent);
        }
        self.min = Some(node);
        self.delete_min()
    }

    /// Merges `other` into this heap by splicing the two root lists.
    ///
    /// **Time Complexity**: O(1)
    ///
    /// Handles issued by `other` keep working and now refer to elements of
    /// `self`.
    pub fn meld(&mut self, mut other: Self) {
        let other_first = other.first.take();
        let other_min = other.min.take();
        self.len += std::mem::take(&mut other.len);
        self.roots += std::mem::take(&mut other.roots);
        self.marked += std::mem::take(&mut other.marked);
        self.stats.absorb(other.stats);
        other.owner.forward_to(&self.owner);

        let Some(other_first) = other_first else {
            return;
        };
        match self.first.clone() {
            None => {
                self.first = Some(other_first);
                self.min = other_min;
            }
            Some(first) => {
                node::splice_before(&other_first, &first);
                if let Some(other_min) = &other_min {
                    self.update_min(other_min);
                }
            }
        }
        self.check();
    }

    /// Number of root trees of each rank: index `i` counts trees of rank `i`.
    ///
    /// An empty heap returns an empty vector. **Time Complexity**: O(roots)
    pub fn counters_rep(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for root in node::ring(self.first.as_ref()) {
            let rank = root.borrow().rank as usize;
            if rank >= counts.len() {
                counts.resize(rank + 1, 0);
            }
            counts[rank] += 1;
        }
        counts
    }

    /// The `k` smallest keys of a single-tree heap, in non-decreasing order.
    ///
    /// See [`crate::k_smallest::k_smallest`].
    pub fn k_smallest(&self, k: usize) -> Result<Vec<Key>, HeapError> {
        crate::k_smallest::k_smallest(self, k)
    }

    pub(crate) fn first_root(&self) -> Option<&Link<T>> {
        self.first.as_ref()
    }

    /// The live node behind `handle`, if it belongs to this heap.
    ///
    /// Only the token chain is compressed. The node itself is not written,
    /// since `&self` callers may overlap with references from `peek`.
    fn resolve(&self, handle: &FibonacciHandle<T>) -> Result<Link<T>, HeapError> {
        let node = handle.upgrade()?;
        let owner = node.borrow().owner.resolve();
        if !owner.ptr_eq(&self.owner) {
            return Err(HeapError::InvalidHandle);
        }
        Ok(node)
    }

    fn update_min(&mut self, candidate: &Link<T>) {
        let smaller = match &self.min {
            None => true,
            Some(min) => key_of(candidate) < key_of(min),
        };
        if smaller {
            self.min = Some(candidate.clone());
        }
    }

    /// Links equal-rank roots until all ranks are distinct, then rebuilds the
    /// root list in rank order and recomputes the minimum.
    fn consolidate(&mut self) {
        self.min = None;
        let Some(first) = self.first.take() else {
            return;
        };
        let roots: Vec<Link<T>> = node::siblings(&first).collect();
        drop(first);

        let mut table: SmallVec<[Option<Link<T>>; 64]> =
            SmallVec::from_elem(None, rank::consolidation_slots(self.len));

        for root in roots {
            node::make_solitary(&root);
            let mut x = root;
            let mut d = x.borrow().rank as usize;
            loop {
                if d >= table.len() {
                    table.resize(d + 1, None);
                }
                match table[d].take() {
                    None => {
                        table[d] = Some(x);
                        break;
                    }
                    Some(mut y) => {
                        // Ties keep the tree already in the slot on top.
                        if key_of(&y) <= key_of(&x) {
                            std::mem::swap(&mut x, &mut y);
                        }
                        self.link(&y, &x);
                        d += 1;
                    }
                }
            }
        }

        self.roots = 0;
        for tree in table.into_iter().flatten() {
            match &self.first {
                None => self.first = Some(tree.clone()),
                Some(first) => node::link_before(&tree, first),
            }
            self.update_min(&tree);
            self.roots += 1;
        }
    }

    /// Hangs the solitary root `child` under the root `parent`.
    fn link(&mut self, child: &Link<T>, parent: &Link<T>) {
        {
            let mut c = child.borrow_mut();
            debug_assert!(!c.marked, "roots are never marked");
            c.parent = parent.downgrade();
        }
        match node::first_child(parent) {
            Some(existing) => node::link_before(child, &existing),
            None => parent.borrow_mut().child = Some(child.clone()),
        }
        let mut p = parent.borrow_mut();
        p.rank = checked_increment(p.rank);
        self.stats.record_link();
    }

    /// Cuts `node` from `parent`, then keeps cutting while the parent is a
    /// marked non-root. The first unmarked non-root ancestor gets marked.
    fn cascading_cut(&mut self, node: Link<T>, parent: Link<T>) {
        let mut x = node;
        let mut p = parent;
        loop {
            self.cut(&x, &p);
            x = p;
            let Some(grandparent) = node::parent(&x) else {
                return;
            };
            let was_marked = x.borrow().marked;
            if !was_marked {
                x.borrow_mut().marked = true;
                self.marked += 1;
                return;
            }
            p = grandparent;
        }
    }

    /// Detaches `node` from `parent`'s child list and makes it the first root.
    fn cut(&mut self, node: &Link<T>, parent: &Link<T>) {
        if node::is_solitary(node) {
            parent.borrow_mut().child = None;
        } else {
            let points_here = parent
                .borrow()
                .child
                .as_ref()
                .is_some_and(|c| c.ptr_eq(node));
            if points_here {
                parent.borrow_mut().child = Some(node::next(node));
            }
            node::unlink(node);
        }
        {
            let mut p = parent.borrow_mut();
            p.rank = saturating_decrement(p.rank);
        }
        {
            let mut n = node.borrow_mut();
            n.parent = WeakNodeRef::empty();
            if n.marked {
                n.marked = false;
                self.marked -= 1;
            }
        }
        if let Some(first) = &self.first {
            node::link_before(node, first);
        }
        self.first = Some(node.clone());
        self.roots += 1;
        self.stats.record_cut();
    }

    /// Recomputes `roots + 2 * marked` by walking the whole forest.
    ///
    /// **Time Complexity**: O(n). Use [`potential`](Self::potential) outside
    /// of tests.
    pub fn recount_potential(&self) -> usize {
        let mut roots = 0;
        let mut marked = 0;
        let mut stack: Vec<Link<T>> = Vec::new();
        for root in node::ring(self.first.as_ref()) {
            roots += 1;
            stack.push(root);
        }
        while let Some(n) = stack.pop() {
            if n.borrow().marked {
                marked += 1;
            }
            let child = node::first_child(&n);
            stack.extend(node::ring(child.as_ref()));
        }
        roots + 2 * marked
    }

    /// Verifies every structural invariant by walking the whole forest:
    ///
    /// - `next`/`prev` are mutually consistent in every ring
    /// - roots have no parent and are not marked
    /// - every child points back at its parent and has a key `>=` it
    /// - every rank equals the size of the child list
    /// - the minimum is a root and no key is below it
    /// - `len`, the root count and the marked count match the forest
    pub fn verify_internal_structure(&self) -> bool {
        let Some(first) = &self.first else {
            return self.min.is_none() && self.len == 0 && self.roots == 0 && self.marked == 0;
        };
        let Some(min) = &self.min else {
            return false;
        };
        let min_key = key_of(min);
        let limit = self.len + 1;
        let mut min_is_root = false;
        let mut roots = 0;
        let mut stack: Vec<Link<T>> = Vec::new();

        for root in node::siblings(first).take(limit) {
            if !Self::ring_links_consistent(&root) {
                return false;
            }
            let (is_root, marked) = {
                let r = root.borrow();
                (r.is_root(), r.marked)
            };
            if !is_root || marked {
                return false;
            }
            min_is_root |= root.ptr_eq(min);
            roots += 1;
            stack.push(root);
        }

        let mut count = 0;
        let mut marked = 0;
        while let Some(n) = stack.pop() {
            count += 1;
            if count > self.len {
                return false;
            }
            let (key, rank, is_marked) = {
                let b = n.borrow();
                (b.key, b.rank as usize, b.marked)
            };
            if key < min_key {
                return false;
            }
            if is_marked {
                marked += 1;
            }
            let child = node::first_child(&n);
            let mut children = 0;
            for c in node::ring(child.as_ref()).take(limit) {
                if !Self::ring_links_consistent(&c) {
                    return false;
                }
                let points_back = c.borrow().parent.points_to(&n);
                if !points_back || key_of(&c) < key {
                    return false;
                }
                children += 1;
                stack.push(c);
            }
            if children != rank {
                return false;
            }
        }

        min_is_root && count == self.len && roots == self.roots && marked == self.marked
    }

    fn ring_links_consistent(n: &Link<T>) -> bool {
        node::prev(&node::next(n)).ptr_eq(n) && node::next(&node::prev(n)).ptr_eq(n)
    }

    #[inline]
    fn check(&self) {
        #[cfg(feature = "debug-invariants")]
        debug_assert!(
            self.verify_internal_structure(),
            "Fibonacci heap invariants violated"
        );
    }
}

impl FibonacciHeap<()> {
    /// Inserts a bare key.
    pub fn insert_key(&mut self, key: Key) -> FibonacciHandle<()> {
        self.insert(key, ())
    }
}

impl<T> Drop for FibonacciHeap<T> {
    fn drop(&mut self) {
        // Rings of two or more nodes are `Rc` cycles, so tear them apart by
        // hand. Iterative, so deep trees cannot overflow the stack.
        self.min = None;
        let mut pending: Vec<Link<T>> = self.first.take().into_iter().collect();
        while let Some(start) = pending.pop() {
            let members: Vec<Link<T>> = node::siblings(&start).collect();
            for n in members {
                node::make_solitary(&n);
                let child = n.borrow_mut().child.take();
                pending.extend(child);
            }
        }
    }
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.min_key())
            .field("roots", &self.roots)
            .field("marked", &self.marked)
            .finish()
    }
}

impl<T> Extend<(Key, T)> for FibonacciHeap<T> {
    fn extend<I: IntoIterator<Item = (Key, T)>>(&mut self, iter: I) {
        for (key, item) in iter {
            self.insert(key, item);
        }
    }
}

impl<T> FromIterator<(Key, T)> for FibonacciHeap<T> {
    fn from_iter<I: IntoIterator<Item = (Key, T)>>(iter: I) -> Self {
        let mut heap = FibonacciHeap::new();
        heap.extend(iter);
        heap
    }
}

impl<T> Heap<T, Key> for FibonacciHeap<T> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, priority: Key, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&Key, &T)> {
        FibonacciHeap::peek(self)
    }

    fn pop(&mut self) -> Option<(Key, T)> {
        self.delete_min().ok()
    }

    fn merge(&mut self, other: Self) {
        self.meld(other);
    }
}

impl<T> DecreaseKeyHeap<T, Key> for FibonacciHeap<T> {
    type Handle = FibonacciHandle<T>;

    fn push_with_handle(&mut self, priority: Key, item: T) -> Self::Handle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: Key) -> Result<(), HeapError> {
        let current = self.key_of(handle)?;
        if new_priority >= current {
            return Err(HeapError::PriorityNotDecreased);
        }
        let delta = current
            .checked_sub(new_priority)
            .ok_or(HeapError::KeyOverflow)?;
        self.decrease_key_by(handle, delta)
    }
}

//! Heap nodes and the circular-list splice primitives.
//!
//! Every node sits in exactly one circular doubly-linked list: the root list
//! if it is a root, otherwise the child list of its parent. Links are stored
//! the way [`crate::storage`] expects: `next` and `child` are strong, `prev`
//! and `parent` are weak.
//!
//! A solitary node stores no self-reference. `next == None` and an empty
//! `prev` both read as "this node", so a singleton ring never forms an `Rc`
//! cycle and a node fresh out of [`Node::new`] is already a valid ring of one.
//!
//! All primitives here are O(1), allocate nothing and cannot fail.

use crate::fibonacci::Key;
use crate::rank::Rank;
use crate::storage::{NodeRef, OwnerToken, WeakNodeRef};

pub(crate) type Link<T> = NodeRef<Node<T>>;
pub(crate) type WeakLink<T> = WeakNodeRef<Node<T>>;

pub(crate) struct Node<T> {
    pub(crate) key: Key,
    pub(crate) item: T,
    /// Number of nodes in the child list.
    pub(crate) rank: Rank,
    /// Set when a child was cut since this node last became a child.
    pub(crate) marked: bool,
    /// Empty iff the node is a root.
    pub(crate) parent: WeakLink<T>,
    pub(crate) child: Option<Link<T>>,
    /// Heap that allocated the node, possibly forwarded by merges.
    pub(crate) owner: OwnerToken,
    next: Option<Link<T>>,
    prev: WeakLink<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(key: Key, item: T, owner: OwnerToken) -> Self {
        Node {
            key,
            item,
            rank: 0,
            marked: false,
            parent: WeakNodeRef::empty(),
            child: None,
            owner,
            next: None,
            prev: WeakNodeRef::empty(),
        }
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_dangling()
    }
}

#[inline]
pub(crate) fn key_of<T>(node: &Link<T>) -> Key {
    node.borrow().key
}

#[inline]
pub(crate) fn next<T>(node: &Link<T>) -> Link<T> {
    let next = node.borrow().next.clone();
    next.unwrap_or_else(|| node.clone())
}

#[inline]
pub(crate) fn prev<T>(node: &Link<T>) -> Link<T> {
    let prev = node.borrow().prev.upgrade();
    prev.unwrap_or_else(|| node.clone())
}

#[inline]
pub(crate) fn is_solitary<T>(node: &Link<T>) -> bool {
    node.borrow().next.is_none()
}

#[inline]
pub(crate) fn parent<T>(node: &Link<T>) -> Option<Link<T>> {
    node.borrow().parent.upgrade()
}

#[inline]
pub(crate) fn first_child<T>(node: &Link<T>) -> Option<Link<T>> {
    node.borrow().child.clone()
}

/// Sets `a.next = b` and `b.prev = a`. The old neighbours of `a` and `b` are
/// not touched; the caller fixes the other ends.
pub(crate) fn connect<T>(a: &Link<T>, b: &Link<T>) {
    if a.ptr_eq(b) {
        make_solitary(a);
        return;
    }
    a.borrow_mut().next = Some(b.clone());
    b.borrow_mut().prev = a.downgrade();
}

/// Inserts the solitary node `a` into `b`'s ring immediately before `b`.
pub(crate) fn link_before<T>(a: &Link<T>, b: &Link<T>) {
    let before = prev(b);
    connect(&before, a);
    connect(a, b);
}

/// Joins the ring containing `b` into the ring containing `a`, placing all of
/// `b`'s ring (in order, starting at `b`) immediately before `a`.
pub(crate) fn splice_before<T>(b: &Link<T>, a: &Link<T>) {
    let a_last = prev(a);
    let b_last = prev(b);
    connect(&a_last, b);
    connect(&b_last, a);
}

/// Removes `node` from its ring, closing the gap, and leaves it solitary.
pub(crate) fn unlink<T>(node: &Link<T>) {
    if is_solitary(node) {
        return;
    }
    let before = prev(node);
    let after = next(node);
    connect(&before, &after);
    make_solitary(node);
}

pub(crate) fn make_solitary<T>(node: &Link<T>) {
    let mut n = node.borrow_mut();
    n.next = None;
    n.prev = WeakNodeRef::empty();
}

/// Iterator over one ring, starting at `start` and stopping before it comes
/// around again. The ring's `next` links must not change while iterating.
pub(crate) struct Siblings<T> {
    start: Link<T>,
    current: Option<Link<T>>,
}

pub(crate) fn siblings<T>(start: &Link<T>) -> Siblings<T> {
    Siblings {
        start: start.clone(),
        current: Some(start.clone()),
    }
}

/// Siblings of an optional ring entry; empty for `None`.
pub(crate) fn ring<T>(start: Option<&Link<T>>) -> impl Iterator<Item = Link<T>> {
    start.map(siblings).into_iter().flatten()
}

impl<T> Iterator for Siblings<T> {
    type Item = Link<T>;

    fn next(&mut self) -> Option<Link<T>> {
        let current = self.current.take()?;
        let after = next(&current);
        if !after.ptr_eq(&self.start) {
            self.current = Some(after);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: Key) -> Link<()> {
        NodeRef::new(Node::new(key, (), OwnerToken::new()))
    }

    fn keys_from(start: &Link<()>) -> Vec<Key> {
        siblings(start).map(|n| key_of(&n)).collect()
    }

    fn assert_consistent(start: &Link<()>) {
        for n in siblings(start) {
            assert!(prev(&next(&n)).ptr_eq(&n));
            assert!(next(&prev(&n)).ptr_eq(&n));
        }
    }

    #[test]
    fn test_fresh_node_is_ring_of_one() {
        let a = node(1);
        assert!(is_solitary(&a));
        assert!(next(&a).ptr_eq(&a));
        assert!(prev(&a).ptr_eq(&a));
        assert_eq!(keys_from(&a), vec![1]);
    }

    #[test]
    fn test_link_before_builds_ring() {
        let a = node(1);
        let b = node(2);
        let c = node(3);
        link_before(&b, &a);
        link_before(&c, &a);
        assert_eq!(keys_from(&a), vec![1, 2, 3]);
        assert!(prev(&a).ptr_eq(&c));
        assert_consistent(&a);
    }

    #[test]
    fn test_unlink_middle_and_last() {
        let a = node(1);
        let b = node(2);
        let c = node(3);
        link_before(&b, &a);
        link_before(&c, &a);

        unlink(&b);
        assert!(is_solitary(&b));
        assert_eq!(keys_from(&a), vec![1, 3]);
        assert_consistent(&a);

        unlink(&c);
        assert!(is_solitary(&a));
        assert_eq!(keys_from(&a), vec![1]);
    }

    #[test]
    fn test_splice_before_joins_rings() {
        let a = node(1);
        let b = node(2);
        link_before(&b, &a);
        let x = node(10);
        let y = node(11);
        link_before(&y, &x);

        splice_before(&x, &a);
        assert_eq!(keys_from(&a), vec![1, 2, 10, 11]);
        assert_consistent(&a);
    }

    #[test]
    fn test_splice_two_singletons() {
        let a = node(1);
        let b = node(2);
        splice_before(&b, &a);
        assert_eq!(keys_from(&a), vec![1, 2]);
        assert_eq!(keys_from(&b), vec![2, 1]);
        assert_consistent(&a);
    }

    #[test]
    fn test_connect_self_makes_solitary() {
        let a = node(1);
        let b = node(2);
        link_before(&b, &a);
        // Drop b from the ring by hand, the way cut does it.
        connect(&a, &a);
        make_solitary(&b);
        assert!(is_solitary(&a));
        assert!(is_solitary(&b));
    }

    #[test]
    fn test_ring_of_none_is_empty() {
        assert_eq!(ring::<()>(None).count(), 0);
    }
}

//! Reference-counted node storage.
//!
//! Nodes live in `Rc<RefCell<N>>` cells. Two reference kinds are provided:
//!
//! - [`NodeRef`]: a strong reference. Strong edges are the ones that own a
//!   node: a sibling's `next` link, a parent's `child` link and the heap's own
//!   entry points.
//! - [`WeakNodeRef`]: a non-owning reference, used for `prev` and `parent`
//!   links and for caller-held handles. Upgrading fails once the node has been
//!   removed from its heap, which is how stale handles are detected.
//!
//! [`OwnerToken`] stamps each node with the heap it belongs to, so a live
//! handle presented to the wrong heap is detected too.
//!
//! Borrows through these wrappers are always short: take a value out, release
//! the borrow, then touch the next node. Two nodes of the same ring may be the
//! same cell, so a borrow must never be held across a call on another node.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Strong reference to a node cell. Equality is identity.
pub struct NodeRef<N>(Rc<RefCell<N>>);

impl<N> NodeRef<N> {
    /// Allocate a new cell holding `node`.
    #[inline]
    pub fn new(node: N) -> Self {
        NodeRef(Rc::new(RefCell::new(node)))
    }

    /// Borrow the inner value immutably
    #[inline]
    pub fn borrow(&self) -> Ref<'_, N> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, N> {
        self.0.borrow_mut()
    }

    /// Get raw pointer for unsafe peek operations
    #[inline]
    pub fn as_ptr(&self) -> *mut N {
        self.0.as_ptr()
    }

    /// Create a non-owning reference to the same cell.
    #[inline]
    pub fn downgrade(&self) -> WeakNodeRef<N> {
        WeakNodeRef(Rc::downgrade(&self.0))
    }

    /// Check if two references point to the same cell
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Extract the node if this is the last strong reference.
    pub fn into_inner(self) -> Option<N> {
        Rc::try_unwrap(self.0).ok().map(RefCell::into_inner)
    }
}

impl<N> Clone for NodeRef<N> {
    fn clone(&self) -> Self {
        NodeRef(Rc::clone(&self.0))
    }
}

impl<N> PartialEq for NodeRef<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<N> Eq for NodeRef<N> {}

impl<N> fmt::Debug for NodeRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&Rc::as_ptr(&self.0)).finish()
    }
}

/// Non-owning reference to a node cell.
pub struct WeakNodeRef<N>(Weak<RefCell<N>>);

impl<N> WeakNodeRef<N> {
    /// A reference that points to nothing (analogous to `Weak::new()`).
    #[inline]
    pub fn empty() -> Self {
        WeakNodeRef(Weak::new())
    }

    /// Attempt to recover a strong reference; `None` once the node is gone.
    #[inline]
    pub fn upgrade(&self) -> Option<NodeRef<N>> {
        self.0.upgrade().map(NodeRef)
    }

    /// True if the referenced node no longer exists (or never did).
    #[inline]
    pub fn is_dangling(&self) -> bool {
        self.0.strong_count() == 0
    }

    /// Check if two weak references point to the same cell
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Check if this weak reference points at the cell behind `strong`.
    #[inline]
    pub fn points_to(&self, strong: &NodeRef<N>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&strong.0))
    }
}

impl<N> Clone for WeakNodeRef<N> {
    fn clone(&self) -> Self {
        WeakNodeRef(Weak::clone(&self.0))
    }
}

impl<N> fmt::Debug for WeakNodeRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakNodeRef").field(&self.0.as_ptr()).finish()
    }
}

/// Identity of the heap a node belongs to.
///
/// Every heap holds one token and stamps it on the nodes it allocates. When a
/// heap is absorbed by a merge its token is forwarded to the receiver's, so
/// the tokens form a union-find forest whose roots are the live heaps.
/// [`resolve`](Self::resolve) follows the forwarding chain and compresses it.
pub struct OwnerToken(Rc<OwnerCell>);

struct OwnerCell {
    forward: RefCell<Option<Rc<OwnerCell>>>,
}

impl OwnerToken {
    pub fn new() -> Self {
        OwnerToken(Rc::new(OwnerCell {
            forward: RefCell::new(None),
        }))
    }

    /// Make every node stamped with `self` belong to `target` from now on.
    ///
    /// `target` must be a root token, i.e. belong to a live heap.
    pub fn forward_to(&self, target: &OwnerToken) {
        debug_assert!(target.0.forward.borrow().is_none());
        if !Rc::ptr_eq(&self.0, &target.0) {
            *self.0.forward.borrow_mut() = Some(Rc::clone(&target.0));
        }
    }

    /// The root token this one forwards to, pointing every cell on the way
    /// directly at it.
    pub fn resolve(&self) -> OwnerToken {
        let mut root = Rc::clone(&self.0);
        let mut chain = Vec::new();
        loop {
            let next = root.forward.borrow().clone();
            match next {
                Some(next) => chain.push(std::mem::replace(&mut root, next)),
                None => break,
            }
        }
        // The first hop already points at the root when the chain is short.
        if chain.len() > 1 {
            for cell in chain {
                *cell.forward.borrow_mut() = Some(Rc::clone(&root));
            }
        }
        OwnerToken(root)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Clone for OwnerToken {
    fn clone(&self) -> Self {
        OwnerToken(Rc::clone(&self.0))
    }
}

impl fmt::Debug for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnerToken").field(&Rc::as_ptr(&self.0)).finish()
    }
}

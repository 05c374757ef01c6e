//! Scheduling primitives behind the public walker handles.
//!
//! Kept out of the public surface; [`WalkerHandle`](super::immutable::WalkerHandle) and
//! [`WalkerNodeHandle`](super::immutable::WalkerNodeHandle) wrap these.
use std::cell::RefCell;

use crate::expr::Expression;

/// Pending visits, last scheduled on top.
pub(super) type WalkerStackType<I> = Vec<(Expression, I)>;

/// Schedules one child of the node being visited.
pub(super) struct InternalWalkerNodeHandle<'a, I> {
    pub(super) stack: &'a RefCell<WalkerStackType<I>>,
    pub(super) child: Expression,
}

impl<'a, I> InternalWalkerNodeHandle<'a, I> {
    #[inline]
    pub fn schedule(&self, input: I) {
        self.stack.borrow_mut().push((self.child.clone(), input));
    }
}

/// Controls the traversal from the node being visited.
pub(super) struct InternalWalkerHandle<'a, I> {
    pub(super) stack: &'a RefCell<WalkerStackType<I>>,
    pub(super) current: Expression,
}

impl<'a, I> InternalWalkerHandle<'a, I> {
    /// Drop every pending visit. Visits scheduled afterwards still run.
    #[inline]
    pub fn break_(&self) {
        self.stack.borrow_mut().clear();
    }
}

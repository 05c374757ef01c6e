use std::{cell::RefCell, ops::Deref};

use smallvec::SmallVec;

use crate::{
    expr::Expression,
    walker::internal::{InternalWalkerHandle, InternalWalkerNodeHandle, WalkerStackType},
};

/// Handle to one child of the visited node.
///
/// Derefs to the child [`Expression`]. Call [`schedule_visit`](Self::schedule_visit) to visit
/// this child with an input of your choice.
pub struct WalkerNodeHandle<'a, I> {
    internal: InternalWalkerNodeHandle<'a, I>,
}

impl<'a, I> WalkerNodeHandle<'a, I> {
    /// Visit this child before anything already pending (depth-first).
    #[inline]
    pub fn schedule_visit(&self, input: I) {
        self.internal.schedule(input);
    }
}

impl<'a, I> Deref for WalkerNodeHandle<'a, I> {
    type Target = Expression;

    fn deref(&self) -> &Self::Target {
        &self.internal.child
    }
}

/// Handle to the node being visited.
///
/// Derefs to the current [`Expression`]; [`children`](Self::children) exposes one
/// [`WalkerNodeHandle`] per child, in [`Expression::children`] order.
pub struct WalkerHandle<'a, I> {
    internal: InternalWalkerHandle<'a, I>,
    children: SmallVec<WalkerNodeHandle<'a, I>, 4>,
}

impl<'a, I> WalkerHandle<'a, I> {
    #[inline]
    pub fn children(&self) -> &[WalkerNodeHandle<'a, I>] {
        &self.children
    }

    /// Schedule every child; they are visited left to right.
    pub fn schedule_children(&self, input: I)
    where
        I: Clone,
    {
        for child in self.children.iter().rev() {
            child.schedule_visit(input.clone());
        }
    }

    /// Stop the traversal. Nodes scheduled after this call are still visited.
    #[inline]
    pub fn break_(&self) {
        self.internal.break_();
    }
}

impl<'a, I> Deref for WalkerHandle<'a, I> {
    type Target = Expression;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.internal.current
    }
}

/// Walk an expression in a DFS, user-scheduled manner.
///
/// The visitor receives the input/state `I` of the current node and a [`WalkerHandle`]. Only
/// children for which a schedule method is called are traversed. Shared subtrees are visited
/// once per path that schedules them.
pub fn walk<F, I>(expr: &Expression, input: I, mut walker: F)
where
    F: FnMut(I, WalkerHandle<'_, I>),
{
    let stack = RefCell::new(WalkerStackType::<I>::new());
    stack.borrow_mut().push((expr.clone(), input));

    loop {
        // Short-lived borrow: the visitor schedules through the same cell.
        let next = stack.borrow_mut().pop();
        let Some((current, input)) = next else {
            break;
        };

        let children = current
            .children()
            .into_iter()
            .map(|child| WalkerNodeHandle {
                internal: InternalWalkerNodeHandle {
                    stack: &stack,
                    child,
                },
            })
            .collect();

        walker(
            input,
            WalkerHandle {
                internal: InternalWalkerHandle {
                    stack: &stack,
                    current,
                },
                children,
            },
        );
    }
}

/// [`walk`] for visitors that carry no per-node state.
#[inline]
pub fn walk_no_input<F>(expr: &Expression, mut walker: F)
where
    F: FnMut(WalkerHandle<'_, ()>),
{
    walk(expr, (), |(), node| walker(node));
}

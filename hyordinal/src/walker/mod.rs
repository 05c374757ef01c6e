//! Iterative walkers over expressions.
//!
//! - [`walk`]: pass an initial input of any type to your visitor; each node decides which
//!   children to visit next with their own input values.
//! - [`walk_no_input`]: the same without per-node state.
//! - [`map_all`]: post-order, copy-on-write rebuild of a whole expression.
//!
//! All three keep their pending work on the heap, so deep values do not exhaust the native
//! stack. Visitors only descend into the children they schedule, which makes pruned and
//! early-exit searches cheap.
//!
//! Counting nodes:
//! ```
//! use hyordinal::expr::Expression;
//! use hyordinal::walker::walk_no_input;
//!
//! let e = Expression::power(
//!     Expression::omega(),
//!     Expression::plus(vec![Expression::omega(), Expression::one()]),
//! );
//! let mut count = 0usize;
//! walk_no_input(&e, |node| {
//!     node.schedule_children(());
//!     count += 1;
//! });
//! assert_eq!(count, 5);
//! ```
//!
//! Depth of the first collapsing function, stopping early:
//! ```
//! use hyordinal::expr::{ExprType, Expression, OcfVariant};
//! use hyordinal::walker::walk;
//!
//! // Depth of the first collapsing function, if any.
//! let e = Expression::plus(vec![
//!     Expression::omega(),
//!     Expression::ocf(OcfVariant::B, Expression::admissible_omega(Expression::one()), Expression::zero()),
//! ]);
//! let mut found = None;
//! walk(&e, 0usize, |depth, node| {
//!     if node.type_() == ExprType::OrdinalCollapsingFn {
//!         found = Some(depth);
//!         node.break_();
//!         return;
//!     }
//!     node.schedule_children(depth + 1);
//! });
//! assert_eq!(found, Some(1));
//! ```
mod immutable;
mod internal;
mod rebuild;

pub use immutable::*;
pub use rebuild::*;

use crate::expr::{ExprNode, Expression, SlotId};

/// Largest slot id occurring in `expr`, counting slots bound by iterators.
pub fn max_slot_id(expr: &Expression) -> Option<SlotId> {
    let mut max: Option<SlotId> = None;
    walk_no_input(expr, |node| {
        match node.node() {
            ExprNode::Slot(id) => max = max.max(Some(*id)),
            ExprNode::Lambda { args, .. } => max = max.max(args.iter().copied().max()),
            _ => {}
        }
        node.schedule_children(());
    });
    max
}

use std::collections::HashMap;

use smallvec::{SmallVec, smallvec};

use crate::{
    error::OrdinalResult,
    expr::{ExprNode, Expression},
};

enum Frame {
    Enter(Expression),
    Exit(Expression),
}

/// Post-order rebuild of `root` without native recursion.
///
/// Children are mapped before their parent. A parent is reassembled with
/// [`Expression::with_children`] only when some mapped child is a different node than the
/// original (pointer identity); otherwise the original node is reused. `rewrite` is then called
/// on every node with the (possibly reassembled) node and whether it was reassembled; its result
/// replaces the node in the parent.
///
/// Shared subtrees are mapped once per call.
///
/// ```
/// use hyordinal::expr::Expression;
/// use hyordinal::walker::map_all;
///
/// // Replace every omega by 2.
/// let e = Expression::plus(vec![Expression::omega(), Expression::one()]);
/// let out = map_all(&e, |node, _| {
///     Ok(if node.type_().is_omega() { Expression::from(2u64) } else { node })
/// })
/// .unwrap();
/// assert_eq!(out.to_string(), "2+1");
/// ```
pub fn map_all<F>(root: &Expression, mut rewrite: F) -> OrdinalResult<Expression>
where
    F: FnMut(Expression, bool) -> OrdinalResult<Expression>,
{
    let mut memo: HashMap<*const ExprNode, Expression> = HashMap::new();
    let mut frames: SmallVec<Frame, 16> = smallvec![Frame::Enter(root.clone())];
    let mut results: Vec<Expression> = Vec::new();

    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Enter(node) => {
                if let Some(done) = memo.get(&node.as_ptr()) {
                    results.push(done.clone());
                    continue;
                }

                let children = node.children();
                frames.push(Frame::Exit(node));
                frames.extend(children.iter().rev().cloned().map(Frame::Enter));
            }
            Frame::Exit(node) => {
                let mapped = results.split_off(results.len().saturating_sub(node.child_count()));
                let changed = mapped
                    .iter()
                    .zip(node.children().iter())
                    .any(|(new, old)| !new.ptr_eq(old));

                let assembled = if changed {
                    node.with_children(mapped)?
                } else {
                    node.clone()
                };
                let out = rewrite(assembled, changed)?;
                memo.insert(node.as_ptr(), out.clone());
                results.push(out);
            }
        }
    }

    Ok(results.pop().unwrap_or_else(|| root.clone()))
}

//! Total order over ordinal expressions.
//!
//! [`compare`] orders two expressions by the magnitude of the ordinals they denote. The
//! comparison is driven by an [`Evaluator`] over [`Comparison`] frames, so comparing deeply
//! nested values never grows the native stack.
//!
//! Rules, by the first that applies to a pair `(a, b)`:
//! 1. Numbers compare numerically; a number is below every other node.
//! 2. If either side is a sum: lexicographic over terms, a non-sum being a one-term list and the
//!    shorter list padded with `0`.
//! 3. Else if either is a product: the same over factors, padded with `1`.
//! 4. Else if either is a power: `[base, exponent]` lexicographically, a non-power `x` read as
//!    `[x, 1]`.
//! 5. Admissible levels compare by subscript; against an inaccessible, the subscript is compared
//!    with the whole inaccessible.
//! 6. Inaccessibles use the two-phase dominance scan (see [`Comparison::InaccessibleScan`]).
//! 7. Collapsing functions of one variant compare `[subscript, arg]`; mixing variants is
//!    [`UnsupportedOperation::CrossVariantCollapse`].
//! 8. A collapsing function against an admissible level compares its subscript with the level;
//!    a tie puts the collapsing function above.
//! 9. Slots by id; iterators by bound slots, then arity, then children.
//! 10. Otherwise equal kinds are equal and different kinds follow the [`ExprType`](crate::expr::ExprType) rank.
use std::cmp::Ordering;

use smallvec::{SmallVec, smallvec};

use crate::{
    error::{OrdinalError, OrdinalResult, UnsupportedOperation},
    evaluator::{Continuation, Evaluator},
    expr::{Children, ExprNode, Expression},
};

/// Suspended step of a magnitude comparison.
pub enum Comparison {
    /// Compare two expressions.
    Pair(Expression, Expression),

    /// Lexicographic comparison, resumed after each element pair. The first non-equal element
    /// decides; when every position ties the result is `on_tie`.
    Sequence {
        lhs: Children,
        rhs: Children,
        padding: Expression,
        next: usize,
        on_tie: Ordering,
    },

    /// Reverse the order produced by the frame below.
    Reverse,

    /// First phase of comparing two inaccessibles: arguments are scanned from the most
    /// significant index down to the first difference. `remaining` is the index compared last
    /// (and the number of indices left).
    InaccessibleScan {
        lhs: Expression,
        rhs: Expression,
        lhs_args: Vec<Expression>,
        rhs_args: Vec<Expression>,
        remaining: usize,
    },

    /// Second phase: the provisionally smaller side may still dominate through one of its
    /// arguments at or below the first difference. Each such argument is compared against the
    /// whole provisionally larger value.
    InaccessibleDominance {
        larger: Expression,
        smaller_args: Vec<Expression>,
        provisional: Ordering,
        remaining: usize,
    },
}

impl Comparison {
    fn sequence(lhs: Children, rhs: Children, padding: Expression, on_tie: Ordering) -> Self {
        Comparison::Sequence {
            lhs,
            rhs,
            padding,
            next: 0,
            on_tie,
        }
    }

    fn inaccessible(lhs: &Expression, rhs: &Expression, a: &[Expression], b: &[Expression]) -> Self {
        let len = a.len().max(b.len());
        let pad = |args: &[Expression]| {
            let mut args = args.to_vec();
            args.resize_with(len, Expression::zero);
            args
        };
        Comparison::InaccessibleScan {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
            lhs_args: pad(a),
            rhs_args: pad(b),
            remaining: len,
        }
    }
}

fn power_parts(e: &Expression) -> Children {
    match e.node() {
        ExprNode::Power { base, exponent } => smallvec![base.clone(), exponent.clone()],
        _ => smallvec![e.clone(), Expression::one()],
    }
}

fn pair(
    lhs: Expression,
    rhs: Expression,
    ev: &mut Evaluator<Comparison>,
) -> OrdinalResult<Option<Ordering>> {
    use ExprNode as N;

    if lhs.ptr_eq(&rhs) {
        return Ok(Some(Ordering::Equal));
    }

    match (lhs.node(), rhs.node()) {
        (N::Number(a), N::Number(b)) => return Ok(Some(a.cmp(b))),
        (N::Number(_), _) => return Ok(Some(Ordering::Less)),
        (_, N::Number(_)) => return Ok(Some(Ordering::Greater)),
        _ => {}
    }

    let (lt, rt) = (lhs.type_(), rhs.type_());
    if lt.is_plus() || rt.is_plus() {
        ev.schedule(Comparison::sequence(
            lhs.summands().cloned().collect(),
            rhs.summands().cloned().collect(),
            Expression::zero(),
            Ordering::Equal,
        ));
        return Ok(None);
    }
    if lt.is_times() || rt.is_times() {
        ev.schedule(Comparison::sequence(
            lhs.factors().cloned().collect(),
            rhs.factors().cloned().collect(),
            Expression::one(),
            Ordering::Equal,
        ));
        return Ok(None);
    }
    if lt.is_power() || rt.is_power() {
        ev.schedule(Comparison::sequence(
            power_parts(&lhs),
            power_parts(&rhs),
            Expression::zero(),
            Ordering::Equal,
        ));
        return Ok(None);
    }

    match (lhs.node(), rhs.node()) {
        (N::AdmissibleOmega { subscript: a }, N::AdmissibleOmega { subscript: b }) => {
            ev.schedule(Comparison::Pair(a.clone(), b.clone()));
            Ok(None)
        }
        (N::AdmissibleOmega { subscript }, N::InaccessibleOrdinal { .. }) => {
            ev.schedule(Comparison::Pair(subscript.clone(), rhs.clone()));
            Ok(None)
        }
        (N::InaccessibleOrdinal { .. }, N::AdmissibleOmega { subscript }) => {
            ev.schedule(Comparison::Reverse);
            ev.schedule(Comparison::Pair(subscript.clone(), lhs.clone()));
            Ok(None)
        }
        (N::InaccessibleOrdinal { args: a }, N::InaccessibleOrdinal { args: b }) => {
            ev.schedule(Comparison::inaccessible(&lhs, &rhs, a, b));
            Ok(None)
        }
        (
            N::OrdinalCollapsingFn {
                variant: va,
                subscript: sa,
                arg: aa,
            },
            N::OrdinalCollapsingFn {
                variant: vb,
                subscript: sb,
                arg: ab,
            },
        ) => {
            if va != vb {
                return Err(OrdinalError::Unsupported(
                    UnsupportedOperation::CrossVariantCollapse { lhs: *va, rhs: *vb },
                ));
            }
            ev.schedule(Comparison::sequence(
                smallvec![sa.clone(), aa.clone()],
                smallvec![sb.clone(), ab.clone()],
                Expression::zero(),
                Ordering::Equal,
            ));
            Ok(None)
        }
        (N::OrdinalCollapsingFn { subscript, .. }, N::AdmissibleOmega { .. }) => {
            ev.schedule(Comparison::sequence(
                smallvec![subscript.clone()],
                smallvec![rhs.clone()],
                Expression::zero(),
                Ordering::Greater,
            ));
            Ok(None)
        }
        (N::AdmissibleOmega { .. }, N::OrdinalCollapsingFn { subscript, .. }) => {
            ev.schedule(Comparison::sequence(
                smallvec![lhs.clone()],
                smallvec![subscript.clone()],
                Expression::zero(),
                Ordering::Less,
            ));
            Ok(None)
        }
        (N::Slot(a), N::Slot(b)) => Ok(Some(a.cmp(b))),
        (N::Lambda { args: a, .. }, N::Lambda { args: b, .. }) => {
            let head = a
                .len()
                .cmp(&b.len())
                .then_with(|| a[..].cmp(&b[..]))
                .then_with(|| lhs.child_count().cmp(&rhs.child_count()));
            if head.is_ne() {
                return Ok(Some(head));
            }
            ev.schedule(Comparison::sequence(
                lhs.children(),
                rhs.children(),
                Expression::zero(),
                Ordering::Equal,
            ));
            Ok(None)
        }
        _ => Ok(Some(lt.cmp(&rt))),
    }
}

impl Continuation for Comparison {
    type Value = Ordering;
    type Error = OrdinalError;

    fn resume(
        self,
        input: Option<Ordering>,
        ev: &mut Evaluator<Self>,
    ) -> OrdinalResult<Option<Ordering>> {
        match self {
            Comparison::Pair(lhs, rhs) => pair(lhs, rhs, ev),

            Comparison::Sequence {
                lhs,
                rhs,
                padding,
                next,
                on_tie,
            } => {
                if let Some(decided) = input.filter(|ord| ord.is_ne()) {
                    return Ok(Some(decided));
                }
                if next >= lhs.len().max(rhs.len()) {
                    return Ok(Some(on_tie));
                }
                let l = lhs.get(next).cloned().unwrap_or_else(|| padding.clone());
                let r = rhs.get(next).cloned().unwrap_or_else(|| padding.clone());
                ev.schedule(Comparison::Sequence {
                    lhs,
                    rhs,
                    padding,
                    next: next + 1,
                    on_tie,
                });
                ev.schedule(Comparison::Pair(l, r));
                Ok(None)
            }

            Comparison::Reverse => Ok(input.map(Ordering::reverse)),

            Comparison::InaccessibleScan {
                lhs,
                rhs,
                lhs_args,
                rhs_args,
                remaining,
            } => match input {
                Some(provisional) if provisional.is_ne() => {
                    let (larger, smaller_args) = match provisional {
                        Ordering::Greater => (lhs, rhs_args),
                        _ => (rhs, lhs_args),
                    };
                    ev.schedule(Comparison::InaccessibleDominance {
                        larger,
                        smaller_args,
                        provisional,
                        remaining: remaining + 1,
                    });
                    Ok(None)
                }
                _ if remaining == 0 => Ok(Some(Ordering::Equal)),
                _ => {
                    let index = remaining - 1;
                    let (l, r) = (lhs_args[index].clone(), rhs_args[index].clone());
                    ev.schedule(Comparison::InaccessibleScan {
                        lhs,
                        rhs,
                        lhs_args,
                        rhs_args,
                        remaining: index,
                    });
                    ev.schedule(Comparison::Pair(l, r));
                    Ok(None)
                }
            },

            Comparison::InaccessibleDominance {
                larger,
                smaller_args,
                provisional,
                remaining,
            } => match input {
                Some(Ordering::Greater) => Ok(Some(provisional.reverse())),
                Some(Ordering::Equal) => {
                    let lower_nonzero = smaller_args[..remaining].iter().any(|a| !a.is_zero());
                    Ok(Some(if lower_nonzero {
                        provisional.reverse()
                    } else {
                        provisional
                    }))
                }
                _ if remaining == 0 => Ok(Some(provisional)),
                _ => {
                    let index = remaining - 1;
                    let arg = smaller_args[index].clone();
                    ev.schedule(Comparison::InaccessibleDominance {
                        larger: larger.clone(),
                        smaller_args,
                        provisional,
                        remaining: index,
                    });
                    ev.schedule(Comparison::Pair(arg, larger));
                    Ok(None)
                }
            },
        }
    }
}

/// Order `a` and `b` by the ordinals they denote.
///
/// Fails only for comparisons the notation leaves undefined, such as a `BOCF` value against a
/// `MOCF` value.
///
/// ```
/// use std::cmp::Ordering;
/// use hyordinal::compare::compare;
/// use hyordinal::expr::Expression;
///
/// let omega_plus_one = Expression::plus(vec![Expression::omega(), Expression::one()]);
/// assert_eq!(compare(&Expression::omega(), &omega_plus_one).unwrap(), Ordering::Less);
/// assert_eq!(compare(&Expression::from(7u64), &Expression::omega()).unwrap(), Ordering::Less);
/// ```
pub fn compare(a: &Expression, b: &Expression) -> OrdinalResult<Ordering> {
    let mut ev = Evaluator::new();
    ev.schedule(Comparison::Pair(a.clone(), b.clone()));
    Ok(ev.run()?.unwrap_or(Ordering::Equal))
}

fn head_cmp(a: &Expression, b: &Expression) -> Ordering {
    use ExprNode as N;

    match (a.node(), b.node()) {
        (N::Number(x), N::Number(y)) => x.cmp(y),
        (N::Slot(x), N::Slot(y)) => x.cmp(y),
        (
            N::OrdinalCollapsingFn { variant: x, .. },
            N::OrdinalCollapsingFn { variant: y, .. },
        ) => x.cmp(y),
        (N::Lambda { args: x, .. }, N::Lambda { args: y, .. }) => x[..].cmp(&y[..]),
        _ => a.type_().cmp(&b.type_()),
    }
}

/// Order of representations rather than magnitudes: kind and head data, then child count,
/// then children left to right.
///
/// Total and infallible; agrees with `==` on equality.
pub fn structural_cmp(a: &Expression, b: &Expression) -> Ordering {
    let mut stack: SmallVec<(Expression, Expression), 12> = smallvec![(a.clone(), b.clone())];

    while let Some((a, b)) = stack.pop() {
        if a.ptr_eq(&b) {
            continue;
        }
        let head = head_cmp(&a, &b).then_with(|| a.child_count().cmp(&b.child_count()));
        if head.is_ne() {
            return head;
        }
        let pairs: Vec<_> = a.children().into_iter().zip(b.children()).collect();
        stack.extend(pairs.into_iter().rev());
    }

    Ordering::Equal
}

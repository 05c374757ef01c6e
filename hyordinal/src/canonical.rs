//! Canonical forms.
//!
//! The reducers in this module take the children of a freshly built node and return the
//! canonical expression for it, assuming the children are canonical already.
//! [`evaluate`] applies them bottom-up over a whole tree.
//!
//! Canonical forms satisfy:
//! - sums and products are flat, have at least two elements and contain no identity element;
//!   a `0` factor absorbs the whole product;
//! - adjacent terms with equal non-coefficient parts are merged, non-adjacent ones never are;
//! - adjacent factors with equal bases are merged by adding exponents;
//! - powers never have exponent `0` or `1`, and `omega` raised to a fixed point of `x ↦ ω^x`
//!   is that fixed point;
//! - inaccessibles carry no trailing zero arguments.
use std::iter;

use log::trace;
use num_bigint::BigUint;

use crate::{
    compare::compare,
    error::{OrdinalError, OrdinalResult},
    expr::{ExprNode, Expression, OcfVariant},
    sequence::predecessor,
    walker::map_all,
};

/// Largest number of bits a literal power may be folded into.
const MAX_FOLDED_POWER_BITS: u64 = 1 << 20;

/// Canonical form of `expr`.
///
/// Idempotent: evaluating a canonical expression returns a structurally equal one, reusing
/// its nodes.
///
/// ```
/// use hyordinal::canonical::evaluate;
/// use hyordinal::expr::Expression;
///
/// let raw = Expression::plus(vec![5u64.into(), 0u64.into(), 3u64.into()]);
/// assert_eq!(evaluate(&raw).unwrap(), Expression::from(8u64));
/// ```
pub fn evaluate(expr: &Expression) -> OrdinalResult<Expression> {
    map_all(expr, |node, _| evaluate_node(&node))
}

/// Reduce a single node whose children are canonical.
///
/// Returns `node` itself when it is already canonical. Iterators and slots are returned as is.
pub fn evaluate_node(node: &Expression) -> OrdinalResult<Expression> {
    let reduced = match node.node() {
        ExprNode::Plus(terms) => evaluate_plus(terms.iter().cloned()),
        ExprNode::Times(factors) => evaluate_times(factors.iter().cloned()),
        ExprNode::Power { base, exponent } => evaluate_power(base, exponent),
        ExprNode::AdmissibleOmega { subscript } => evaluate_admissible_omega(subscript),
        ExprNode::InaccessibleOrdinal { args } => evaluate_inaccessible(args.iter().cloned()),
        ExprNode::OrdinalCollapsingFn {
            variant,
            subscript,
            arg,
        } => evaluate_ocf(*variant, subscript, arg)?,
        ExprNode::Number(_)
        | ExprNode::Omega
        | ExprNode::OrdinalLabOrdinal
        | ExprNode::Lambda { .. }
        | ExprNode::Slot(_) => return Ok(node.clone()),
    };

    Ok(if reduced.shallow_eq(node) {
        node.clone()
    } else {
        reduced
    })
}

/// Split a term into its non-coefficient part and its trailing literal coefficient.
///
/// A bare number has no non-coefficient part.
fn split_coefficient(term: &Expression) -> (Option<Expression>, BigUint) {
    match term.node() {
        ExprNode::Number(n) => (None, n.clone()),
        ExprNode::Times(factors) => match factors.split_last() {
            Some((last, rest)) if !rest.is_empty() => match last.as_number() {
                Some(k) => {
                    let rest = match rest {
                        [single] => single.clone(),
                        _ => Expression::times(rest.to_vec()),
                    };
                    (Some(rest), k.clone())
                }
                None => (Some(term.clone()), BigUint::from(1u32)),
            },
            _ => (Some(term.clone()), BigUint::from(1u32)),
        },
        _ => (Some(term.clone()), BigUint::from(1u32)),
    }
}

fn with_coefficient(part: Option<Expression>, coefficient: BigUint) -> Expression {
    match part {
        None => Expression::number(coefficient),
        Some(part) if coefficient == BigUint::from(1u32) => part,
        Some(part) => Expression::times(
            part.factors()
                .cloned()
                .chain(iter::once(Expression::number(coefficient)))
                .collect(),
        ),
    }
}

/// Canonical sum of `terms`.
pub fn evaluate_plus(terms: impl IntoIterator<Item = Expression>) -> Expression {
    let mut pending: Vec<Expression> = terms.into_iter().collect();
    pending.reverse();

    let mut out: Vec<Expression> = Vec::with_capacity(pending.len());
    while let Some(term) = pending.pop() {
        if let ExprNode::Plus(inner) = term.node() {
            pending.extend(inner.iter().rev().cloned());
            continue;
        }
        if term.is_zero() {
            continue;
        }

        let merged = out.last().and_then(|last| {
            let (last_part, last_k) = split_coefficient(last);
            let (part, k) = split_coefficient(&term);
            (last_part == part).then(|| with_coefficient(part, last_k + k))
        });
        match merged {
            Some(merged) => {
                out.pop();
                out.push(merged);
            }
            None => out.push(term),
        }
    }

    match out.len() {
        0 => Expression::zero(),
        1 => out.pop().unwrap_or_else(Expression::zero),
        _ => Expression::plus(out),
    }
}

/// Split a factor into base and exponent; anything but a power has exponent `1`.
fn split_exponent(factor: &Expression) -> (Expression, Expression) {
    match factor.node() {
        ExprNode::Power { base, exponent } => (base.clone(), exponent.clone()),
        _ => (factor.clone(), Expression::one()),
    }
}

/// Canonical product of `factors`.
pub fn evaluate_times(factors: impl IntoIterator<Item = Expression>) -> Expression {
    let mut pending: Vec<Expression> = factors.into_iter().collect();
    pending.reverse();

    let mut out: Vec<Expression> = Vec::with_capacity(pending.len());
    while let Some(factor) = pending.pop() {
        if let ExprNode::Times(inner) = factor.node() {
            pending.extend(inner.iter().rev().cloned());
            continue;
        }
        if factor.is_zero() {
            return Expression::zero();
        }
        if factor.is_one() {
            continue;
        }

        let merged = out.last().and_then(|last| {
            if let (Some(a), Some(b)) = (last.as_number(), factor.as_number()) {
                return Some(Expression::number(a * b));
            }
            let (last_base, last_exponent) = split_exponent(last);
            let (base, exponent) = split_exponent(&factor);
            (last_base == base)
                .then(|| evaluate_power(&base, &evaluate_plus([last_exponent, exponent])))
        });
        match merged {
            Some(merged) => {
                out.pop();
                out.push(merged);
            }
            None => out.push(factor),
        }
    }

    match out.len() {
        0 => Expression::one(),
        1 => out.pop().unwrap_or_else(Expression::one),
        _ => Expression::times(out),
    }
}

/// Nodes `x` for which `ω^x = x`.
#[inline]
fn is_omega_fixed_point(expr: &Expression) -> bool {
    matches!(
        expr.node(),
        ExprNode::AdmissibleOmega { .. }
            | ExprNode::OrdinalCollapsingFn { .. }
            | ExprNode::InaccessibleOrdinal { .. }
    )
}

/// Canonical `base^exponent`.
pub fn evaluate_power(base: &Expression, exponent: &Expression) -> Expression {
    if exponent.is_zero() {
        return Expression::one();
    }
    if exponent.is_one() {
        return base.clone();
    }
    if base.is_one() {
        return Expression::one();
    }
    if base.is_zero() {
        return Expression::zero();
    }

    if let (Some(b), Some(e)) = (base.as_number(), exponent.as_number()) {
        if let Ok(e) = u32::try_from(e) {
            if b.bits().saturating_mul(u64::from(e)) <= MAX_FOLDED_POWER_BITS {
                return Expression::number(b.pow(e));
            }
        }
        trace!("leaving {b}^{exponent} unfolded");
    }

    if base.type_().is_omega() {
        if is_omega_fixed_point(exponent) {
            return exponent.clone();
        }
        // ω^(fp^k) = ω^(ω^(fp·k)) since fp = ω^fp.
        if let ExprNode::Power {
            base: fixed_point,
            exponent: k,
        } = exponent.node()
        {
            if is_omega_fixed_point(fixed_point) {
                let shifted = evaluate_times([fixed_point.clone(), k.clone()]);
                return Expression::power(
                    Expression::omega(),
                    evaluate_power(&Expression::omega(), &shifted),
                );
            }
        }
    }

    Expression::power(base.clone(), exponent.clone())
}

/// Canonical `Ω_subscript`.
pub fn evaluate_admissible_omega(subscript: &Expression) -> Expression {
    match subscript.node() {
        _ if subscript.is_zero() => Expression::omega(),
        ExprNode::InaccessibleOrdinal { .. } => subscript.clone(),
        _ => Expression::admissible_omega(subscript.clone()),
    }
}

/// Canonical inaccessible with the given arguments, least significant first.
pub fn evaluate_inaccessible(args: impl IntoIterator<Item = Expression>) -> Expression {
    let mut args: Vec<Expression> = args.into_iter().collect();
    while args.len() > 1 && args.last().is_some_and(Expression::is_zero) {
        args.pop();
    }
    if args.is_empty() {
        args.push(Expression::zero());
    }
    Expression::inaccessible(args)
}

/// Canonical `ψ(subscript)(arg)`.
///
/// A `BOCF` whose subscript `Ω_s` exceeds its argument collapses to `Ω_{s-1}·ω^arg` (`ω^arg`
/// when `Ω_{s-1}` is `ω`). This requires `s` to be a successor.
pub fn evaluate_ocf(
    variant: OcfVariant,
    subscript: &Expression,
    arg: &Expression,
) -> OrdinalResult<Expression> {
    if let (OcfVariant::B, ExprNode::AdmissibleOmega { subscript: level }) =
        (variant, subscript.node())
    {
        if compare(subscript, arg)?.is_gt() {
            let below = predecessor(level).ok_or_else(|| OrdinalError::MissingPredecessor {
                expr: level.to_string(),
            })?;
            let lower = evaluate_admissible_omega(&below);
            let tail = evaluate_power(&Expression::omega(), arg);
            return Ok(if lower.type_().is_omega() {
                tail
            } else {
                evaluate_times([lower, tail])
            });
        }
    }

    Ok(Expression::ocf(variant, subscript.clone(), arg.clone()))
}

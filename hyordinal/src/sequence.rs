//! Fundamental sequences, successors and predecessors.
//!
//! A limit ordinal `α` is the supremum of its fundamental sequence `α[0] < α[1] < ...`. The
//! sequence is represented by a [`FundamentalSequence`]: a canonical template containing a
//! free index slot. [`FundamentalSequence::at`] substitutes a concrete index and expands the
//! iterators the template uses for towers and nested collapses.
//!
//! Derivation walks down the rightmost path that carries the limit structure, recording how
//! to rebuild each level. Once a base case produces the innermost part of the template, the
//! recorded steps are replayed from the inside out through the canonical reducers.
//!
//! ```
//! use hyordinal::expr::Expression;
//! use hyordinal::sequence::fundamental_sequence;
//!
//! // omega^2 = sup { omega*n }
//! let e = Expression::power(Expression::omega(), 2u64.into());
//! let fs = fundamental_sequence(&e).unwrap();
//! assert_eq!(fs.template().to_string(), "omega*#0");
//! assert_eq!(fs.at(3).unwrap().to_string(), "omega*3");
//! ```
use std::iter;

use log::debug;
use num_bigint::BigUint;

use crate::{
    canonical::{
        evaluate_admissible_omega, evaluate_node, evaluate_ocf, evaluate_plus, evaluate_power,
        evaluate_times,
    },
    compare::compare,
    config::EngineConfig,
    error::{OrdinalError, OrdinalResult},
    expr::{ExprNode, Expression, OcfVariant, SlotId},
    walker::{map_all, max_slot_id, walk_no_input},
};

/// Template of a fundamental sequence and the slot standing for its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundamentalSequence {
    template: Expression,
    index: SlotId,
}

impl FundamentalSequence {
    #[inline]
    pub fn template(&self) -> &Expression {
        &self.template
    }

    #[inline]
    pub fn index(&self) -> SlotId {
        self.index
    }

    /// The `n`-th term of the sequence.
    pub fn at(&self, n: u64) -> OrdinalResult<Expression> {
        self.at_with(n, &EngineConfig::default())
    }

    pub fn at_with(&self, n: u64, config: &EngineConfig) -> OrdinalResult<Expression> {
        substitute_with(&self.template, self.index, &Expression::from(n), config)
    }
}

/// Replace `slot` by `value` in `expr` and canonicalize the result.
///
/// Iterators whose iteration count becomes a literal and that have a starting value are
/// expanded: the body is applied `count` times to the starting value through its first bound
/// slot.
pub fn substitute(expr: &Expression, slot: SlotId, value: &Expression) -> OrdinalResult<Expression> {
    substitute_with(expr, slot, value, &EngineConfig::default())
}

pub fn substitute_with(
    expr: &Expression,
    slot: SlotId,
    value: &Expression,
    config: &EngineConfig,
) -> OrdinalResult<Expression> {
    if !substitution_applies(expr, slot) {
        return Ok(expr.clone());
    }
    map_all(expr, |node, rebuilt| match node.node() {
        ExprNode::Slot(id) if *id == slot => Ok(value.clone()),
        ExprNode::Lambda { .. } => expand_lambda(&node, config),
        _ if rebuilt => evaluate_node(&node),
        _ => Ok(node),
    })
}

/// `true` when `slot` occurs in `expr` or an applied iterator may expand.
fn substitution_applies(expr: &Expression, slot: SlotId) -> bool {
    let mut found = false;
    walk_no_input(expr, |node| {
        let hit = match node.node() {
            ExprNode::Slot(id) => *id == slot,
            ExprNode::Lambda { applied_to, .. } => applied_to.is_some(),
            _ => false,
        };
        if hit {
            found = true;
            node.break_();
        } else {
            node.schedule_children(());
        }
    });
    found
}

fn expand_lambda(node: &Expression, config: &EngineConfig) -> OrdinalResult<Expression> {
    let ExprNode::Lambda {
        args,
        body,
        iterations,
        applied_to: Some(start),
    } = node.node()
    else {
        return Ok(node.clone());
    };
    let (Some(bound), Some(count)) = (args.first(), iterations.as_number()) else {
        return Ok(node.clone());
    };

    let limit = config.max_lambda_iterations;
    let count = u64::try_from(count)
        .ok()
        .filter(|count| *count <= limit)
        .ok_or_else(|| OrdinalError::IterationLimitExceeded {
            iterations: count.to_string(),
            limit,
        })?;

    let mut acc = start.clone();
    for _ in 0..count {
        acc = substitute_with(body, *bound, &acc, config)?;
    }
    Ok(acc)
}

/// `true` unless the trailing term is a positive integer, i.e. `expr` has no immediate
/// predecessor. `0` counts as a limit but has no fundamental sequence.
pub fn is_limit_ordinal(expr: &Expression) -> bool {
    let mut current = expr;
    loop {
        match current.node() {
            ExprNode::Plus(terms) => match terms.last() {
                Some(last) => current = last,
                None => return true,
            },
            ExprNode::Number(n) => return *n == BigUint::ZERO,
            _ => return true,
        }
    }
}

/// `expr + 1`.
///
/// ```
/// use hyordinal::expr::Expression;
/// use hyordinal::sequence::successor;
///
/// assert_eq!(successor(&Expression::omega()).to_string(), "omega+1");
/// assert_eq!(successor(&"omega+1".parse().unwrap()).to_string(), "omega+2");
/// ```
pub fn successor(expr: &Expression) -> Expression {
    evaluate_plus(expr.summands().cloned().chain(iter::once(Expression::one())))
}

/// The ordinal whose successor is `expr`, or `None` when `expr` is `0` or a limit.
pub fn predecessor(expr: &Expression) -> Option<Expression> {
    match expr.node() {
        ExprNode::Number(n) if *n > BigUint::ZERO => Some(Expression::number(n - 1u32)),
        ExprNode::Plus(terms) => {
            let (last, rest) = terms.split_last()?;
            let k = last.as_number().filter(|k| **k > BigUint::ZERO)?;
            Some(evaluate_plus(
                rest.iter()
                    .cloned()
                    .chain(iter::once(Expression::number(k - 1u32))),
            ))
        }
        _ => None,
    }
}

struct SlotAllocator {
    next: u32,
}

impl SlotAllocator {
    fn above(expr: &Expression) -> Self {
        Self {
            next: max_slot_id(expr).map_or(0, |id| id.raw() + 1),
        }
    }

    fn fresh(&mut self) -> SlotId {
        let id = SlotId::new(self.next);
        self.next += 1;
        id
    }
}

/// A collapsing function on the derivation path.
struct ActiveCollapse {
    variant: OcfVariant,
    subscript: Expression,
    /// Set when an admissible level below turned this collapse into an iterator over `#t`.
    converted: Option<SlotId>,
}

/// How to rebuild one level of the derivation path around the part derived below it.
enum Rebuild {
    /// `prefix + hole`
    AppendTerm { prefix: Vec<Expression> },
    /// `prefix * hole`
    ReplaceLastFactor { prefix: Vec<Expression> },
    /// `base ^ hole`
    Exponent { base: Expression },
    /// `Omega[hole]`
    AdmissibleSubscript,
    /// `ψ(subscript)(hole)` for the active collapse at `frame`.
    Collapse { frame: usize },
}

fn omega_tower(slot: SlotId, index: SlotId, start: Expression) -> Expression {
    Expression::lambda(
        [slot],
        Expression::power(Expression::omega(), Expression::slot(slot)),
        Expression::slot(index),
        Some(start),
    )
}

/// Fundamental sequence of the limit ordinal `expr`.
pub fn fundamental_sequence(expr: &Expression) -> OrdinalResult<FundamentalSequence> {
    if !is_limit_ordinal(expr) {
        return Err(OrdinalError::NotALimitOrdinal {
            expr: expr.to_string(),
        });
    }

    let mut slots = SlotAllocator::above(expr);
    let index = slots.fresh();
    let hole = Expression::slot(index);

    let mut rebuilds: Vec<Rebuild> = Vec::new();
    let mut active: Vec<ActiveCollapse> = Vec::new();
    let mut current = expr.clone();

    let base = loop {
        match current.node() {
            ExprNode::Omega => break hole,

            ExprNode::OrdinalLabOrdinal => {
                let inner = slots.fresh();
                break Expression::ocf(
                    OcfVariant::M,
                    Expression::admissible_omega(Expression::one()),
                    Expression::lambda(
                        [inner],
                        Expression::admissible_omega(Expression::slot(inner)),
                        hole,
                        Some(Expression::one()),
                    ),
                );
            }

            ExprNode::Plus(terms) => {
                let Some((last, prefix)) = terms.split_last() else {
                    return Err(no_rule(&current));
                };
                rebuilds.push(Rebuild::AppendTerm {
                    prefix: prefix.to_vec(),
                });
                current = last.clone();
            }

            ExprNode::Times(factors) => {
                let Some((last, prefix)) = factors.split_last() else {
                    return Err(no_rule(&current));
                };
                match last.as_number() {
                    Some(k) if *k > BigUint::from(1u32) && !prefix.is_empty() => {
                        let rest = match prefix {
                            [single] => single.clone(),
                            _ => Expression::times(prefix.to_vec()),
                        };
                        let lower = evaluate_times([rest.clone(), Expression::number(k - 1u32)]);
                        rebuilds.push(Rebuild::AppendTerm {
                            prefix: vec![lower],
                        });
                        current = rest;
                    }
                    _ => {
                        rebuilds.push(Rebuild::ReplaceLastFactor {
                            prefix: prefix.to_vec(),
                        });
                        current = last.clone();
                    }
                }
            }

            ExprNode::Power { base, exponent } => match predecessor(exponent) {
                Some(lower) => {
                    rebuilds.push(Rebuild::ReplaceLastFactor {
                        prefix: vec![evaluate_power(base, &lower)],
                    });
                    current = base.clone();
                }
                None => {
                    rebuilds.push(Rebuild::Exponent { base: base.clone() });
                    current = exponent.clone();
                }
            },

            ExprNode::OrdinalCollapsingFn {
                variant,
                subscript,
                arg,
            } => {
                if let Some(lower) = predecessor(arg) {
                    let below = evaluate_ocf(*variant, subscript, &lower)?;
                    break match variant {
                        OcfVariant::B => evaluate_times([below, hole]),
                        OcfVariant::M => omega_tower(slots.fresh(), index, successor(&below)),
                    };
                }

                if let (OcfVariant::M, ExprNode::AdmissibleOmega { subscript: level }) =
                    (variant, subscript.node())
                {
                    if arg.is_zero() {
                        let below = predecessor(level).ok_or_else(|| {
                            OrdinalError::MissingPredecessor {
                                expr: level.to_string(),
                            }
                        })?;
                        let start = successor(&evaluate_admissible_omega(&below));
                        break omega_tower(slots.fresh(), index, start);
                    }
                }

                rebuilds.push(Rebuild::Collapse {
                    frame: active.len(),
                });
                active.push(ActiveCollapse {
                    variant: *variant,
                    subscript: subscript.clone(),
                    converted: None,
                });
                current = arg.clone();
            }

            ExprNode::AdmissibleOmega { subscript } => {
                if predecessor(subscript).is_none() {
                    rebuilds.push(Rebuild::AdmissibleSubscript);
                    current = subscript.clone();
                    continue;
                }

                let mut target = None;
                for (position, frame) in active.iter().enumerate().rev() {
                    if compare(&frame.subscript, &current)?.is_le() {
                        target = Some(position);
                        break;
                    }
                }
                let Some(frame) = target.and_then(|position| active.get_mut(position)) else {
                    return Err(OrdinalError::NoCollapsingContext {
                        admissible: current.to_string(),
                    });
                };

                let bound = slots.fresh();
                frame.converted = Some(bound);
                break evaluate_ocf(frame.variant, &current, &Expression::slot(bound))?;
            }

            ExprNode::Number(_)
            | ExprNode::InaccessibleOrdinal { .. }
            | ExprNode::Lambda { .. }
            | ExprNode::Slot(_) => return Err(no_rule(&current)),
        }
    };

    let mut template = base;
    while let Some(step) = rebuilds.pop() {
        template = match step {
            Rebuild::AppendTerm { prefix } => {
                evaluate_plus(prefix.into_iter().chain(iter::once(template)))
            }
            Rebuild::ReplaceLastFactor { prefix } => {
                evaluate_times(prefix.into_iter().chain(iter::once(template)))
            }
            Rebuild::Exponent { base } => evaluate_power(&base, &template),
            Rebuild::AdmissibleSubscript => evaluate_admissible_omega(&template),
            Rebuild::Collapse { frame } => {
                let Some(collapse) = active.get(frame) else {
                    return Err(no_rule(expr));
                };
                match collapse.converted {
                    Some(bound) => convert_special_ocf_iterator(collapse, bound, index, template)?,
                    None => evaluate_ocf(collapse.variant, &collapse.subscript, &template)?,
                }
            }
        };
    }

    debug!("fundamental sequence of {expr}: {template} over {index}");
    Ok(FundamentalSequence { template, index })
}

/// `ψ(subscript)(Lambda[{bound}, body, #index, 0])`: the collapse iterated `#index` times
/// from `0` through the admissible level that was replaced by `bound`.
fn convert_special_ocf_iterator(
    collapse: &ActiveCollapse,
    bound: SlotId,
    index: SlotId,
    body: Expression,
) -> OrdinalResult<Expression> {
    let iterator = Expression::lambda(
        [bound],
        body,
        Expression::slot(index),
        Some(Expression::zero()),
    );
    evaluate_ocf(collapse.variant, &collapse.subscript, &iterator)
}

fn no_rule(expr: &Expression) -> OrdinalError {
    OrdinalError::NoFundamentalSequence {
        kind: expr.type_(),
        expr: expr.to_string(),
    }
}

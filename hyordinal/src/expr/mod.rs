//! Ordinal expressions: a closed sum type over shared, immutable nodes.
//!
//! Role
//! - [`ExprNode`] is the grammar of the notation; [`Expression`] is a reference-counted handle
//!   to a node. Cloning an [`Expression`] is O(1) and subtrees are freely shared, so values form
//!   a DAG rather than a tree.
//! - Builders on [`Expression`] assemble nodes verbatim. They never normalize; run
//!   [`evaluate`](crate::canonical::evaluate) (or use the reducers in [`canonical`](crate::canonical))
//!   to obtain canonical forms.
//!
//! Equality semantics
//! - [`Expression`] compares by structure: same kinds, same head data (literal values, slot ids,
//!   collapsing variants, bound slots) and pairwise-equal children. Comparison is iterative and
//!   short-circuits on shared nodes.
//!
//! Example
//! ```
//! use hyordinal::expr::{Expression, ExprType};
//!
//! let e = Expression::plus(vec![Expression::omega(), Expression::from(1u64)]);
//! assert_eq!(e.type_(), ExprType::Plus);
//! assert_eq!(e.children().len(), 2);
//! assert_eq!(e.to_string(), "omega+1");
//! ```
pub mod pretty;

use std::{iter, rc::Rc};

use either::Either;
use num_bigint::BigUint;
use smallvec::{SmallVec, smallvec};
use strum::{Display, EnumIs};

use crate::error::{OrdinalError, OrdinalResult};

/// Identifier of a placeholder bound by an iterator or standing for a sequence index.
///
/// Slot ids are only meaningful inside the iterator or template that introduced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Flavour of an ordinal collapsing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIs)]
pub enum OcfVariant {
    /// Buchholz-style collapse (`BOCF`); small arguments collapse to `Ω·ω^arg`.
    #[strum(serialize = "b")]
    B,
    /// The `MOCF` variant; never collapses syntactically.
    #[strum(serialize = "m")]
    M,
}

/// Kind of a node.
///
/// The declaration order is the type rank used to order nodes of different kinds:
/// `plus < times < power < omega < olo < ocf < omega-n < i-n < lambda < slot`. Numbers sit
/// below every compound kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIs)]
pub enum ExprType {
    #[strum(serialize = "number")]
    Number,
    #[strum(serialize = "plus")]
    Plus,
    #[strum(serialize = "times")]
    Times,
    #[strum(serialize = "power")]
    Power,
    #[strum(serialize = "omega")]
    Omega,
    #[strum(serialize = "olo")]
    OrdinalLabOrdinal,
    #[strum(serialize = "ocf")]
    OrdinalCollapsingFn,
    #[strum(serialize = "omega-n")]
    AdmissibleOmega,
    #[strum(serialize = "i-n")]
    InaccessibleOrdinal,
    #[strum(serialize = "lambda")]
    Lambda,
    #[strum(serialize = "slot")]
    Slot,
}

/// A node of the notation.
#[derive(Debug, Clone)]
pub enum ExprNode {
    /// A finite ordinal.
    Number(BigUint),
    /// Ordinal sum of at least two terms, leftmost first.
    Plus(Vec<Expression>),
    /// Ordinal product of at least two factors, leftmost first.
    Times(Vec<Expression>),
    Power {
        base: Expression,
        exponent: Expression,
    },
    /// ω, the first limit ordinal.
    Omega,
    /// The anchor ordinal at the top of the notation.
    OrdinalLabOrdinal,
    /// Ω_subscript, the subscript-th admissible ordinal.
    AdmissibleOmega { subscript: Expression },
    /// Inaccessible-strength hierarchy function; `args[0]` is the least significant argument.
    InaccessibleOrdinal { args: Vec<Expression> },
    /// ψ(subscript)(arg).
    OrdinalCollapsingFn {
        variant: OcfVariant,
        subscript: Expression,
        arg: Expression,
    },
    /// Apply `body` (parametrized by `args[0]`) `iterations` times, starting from `applied_to`.
    /// Without `applied_to` the iterator is an unapplied template.
    Lambda {
        args: SmallVec<SlotId, 2>,
        body: Expression,
        iterations: Expression,
        applied_to: Option<Expression>,
    },
    /// A placeholder.
    Slot(SlotId),
}

/// Shared handle to an immutable [`ExprNode`].
#[derive(Clone)]
pub struct Expression(Rc<ExprNode>);

/// Children of a node, in order.
pub type Children = SmallVec<Expression, 4>;

impl Expression {
    #[inline]
    pub fn new(node: ExprNode) -> Self {
        Self(Rc::new(node))
    }

    #[inline]
    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    /// Return the kind of this node.
    #[inline]
    pub fn type_(&self) -> ExprType {
        match self.node() {
            ExprNode::Number(_) => ExprType::Number,
            ExprNode::Plus(_) => ExprType::Plus,
            ExprNode::Times(_) => ExprType::Times,
            ExprNode::Power { .. } => ExprType::Power,
            ExprNode::Omega => ExprType::Omega,
            ExprNode::OrdinalLabOrdinal => ExprType::OrdinalLabOrdinal,
            ExprNode::AdmissibleOmega { .. } => ExprType::AdmissibleOmega,
            ExprNode::InaccessibleOrdinal { .. } => ExprType::InaccessibleOrdinal,
            ExprNode::OrdinalCollapsingFn { .. } => ExprType::OrdinalCollapsingFn,
            ExprNode::Lambda { .. } => ExprType::Lambda,
            ExprNode::Slot(_) => ExprType::Slot,
        }
    }

    /// `true` when both handles point to the very same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const ExprNode {
        Rc::as_ptr(&self.0)
    }

    // ------------------------------------------------------------------ builders

    pub fn number(value: impl Into<BigUint>) -> Self {
        Self::new(ExprNode::Number(value.into()))
    }

    pub fn zero() -> Self {
        Self::number(0u32)
    }

    pub fn one() -> Self {
        Self::number(1u32)
    }

    pub fn omega() -> Self {
        Self::new(ExprNode::Omega)
    }

    pub fn olo() -> Self {
        Self::new(ExprNode::OrdinalLabOrdinal)
    }

    pub fn slot(id: SlotId) -> Self {
        Self::new(ExprNode::Slot(id))
    }

    pub fn plus(terms: Vec<Expression>) -> Self {
        Self::new(ExprNode::Plus(terms))
    }

    pub fn times(factors: Vec<Expression>) -> Self {
        Self::new(ExprNode::Times(factors))
    }

    pub fn power(base: Expression, exponent: Expression) -> Self {
        Self::new(ExprNode::Power { base, exponent })
    }

    pub fn admissible_omega(subscript: Expression) -> Self {
        Self::new(ExprNode::AdmissibleOmega { subscript })
    }

    pub fn inaccessible(args: Vec<Expression>) -> Self {
        Self::new(ExprNode::InaccessibleOrdinal { args })
    }

    pub fn ocf(variant: OcfVariant, subscript: Expression, arg: Expression) -> Self {
        Self::new(ExprNode::OrdinalCollapsingFn {
            variant,
            subscript,
            arg,
        })
    }

    pub fn lambda(
        args: impl IntoIterator<Item = SlotId>,
        body: Expression,
        iterations: Expression,
        applied_to: Option<Expression>,
    ) -> Self {
        Self::new(ExprNode::Lambda {
            args: args.into_iter().collect(),
            body,
            iterations,
            applied_to,
        })
    }

    // ------------------------------------------------------------------ inspection

    #[inline]
    pub fn as_number(&self) -> Option<&BigUint> {
        match self.node() {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(|n| *n == BigUint::ZERO)
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(|n| *n == BigUint::from(1u32))
    }

    /// Terms of a sum, or the expression itself when it is not a sum.
    pub fn summands(&self) -> impl Iterator<Item = &Expression> {
        match self.node() {
            ExprNode::Plus(terms) => Either::Left(terms.iter()),
            _ => Either::Right(iter::once(self)),
        }
    }

    /// Factors of a product, or the expression itself when it is not a product.
    pub fn factors(&self) -> impl Iterator<Item = &Expression> {
        match self.node() {
            ExprNode::Times(factors) => Either::Left(factors.iter()),
            _ => Either::Right(iter::once(self)),
        }
    }

    /// Number of children; see [`Expression::children`].
    pub fn child_count(&self) -> usize {
        match self.node() {
            ExprNode::Number(_)
            | ExprNode::Omega
            | ExprNode::OrdinalLabOrdinal
            | ExprNode::Slot(_) => 0,
            ExprNode::Plus(items) | ExprNode::Times(items) => items.len(),
            ExprNode::InaccessibleOrdinal { args } => args.len(),
            ExprNode::Power { .. } | ExprNode::OrdinalCollapsingFn { .. } => 2,
            ExprNode::AdmissibleOmega { .. } => 1,
            ExprNode::Lambda { applied_to, .. } => 2 + usize::from(applied_to.is_some()),
        }
    }

    /// Ordered children of this node.
    ///
    /// - Plus / Times: terms / factors
    /// - Power: `[base, exponent]`
    /// - AdmissibleOmega: `[subscript]`
    /// - InaccessibleOrdinal: arguments, least significant first
    /// - OrdinalCollapsingFn: `[subscript, arg]`
    /// - Lambda: `[body, iterations]`, then `applied_to` when present
    /// - leaves: none
    pub fn children(&self) -> Children {
        match self.node() {
            ExprNode::Number(_)
            | ExprNode::Omega
            | ExprNode::OrdinalLabOrdinal
            | ExprNode::Slot(_) => SmallVec::new(),
            ExprNode::Plus(items)
            | ExprNode::Times(items)
            | ExprNode::InaccessibleOrdinal { args: items } => items.iter().cloned().collect(),
            ExprNode::Power { base, exponent } => smallvec![base.clone(), exponent.clone()],
            ExprNode::AdmissibleOmega { subscript } => smallvec![subscript.clone()],
            ExprNode::OrdinalCollapsingFn { subscript, arg, .. } => {
                smallvec![subscript.clone(), arg.clone()]
            }
            ExprNode::Lambda {
                body,
                iterations,
                applied_to,
                ..
            } => {
                let mut children: Children = smallvec![body.clone(), iterations.clone()];
                children.extend(applied_to.iter().cloned());
                children
            }
        }
    }

    /// Child at `index`, in the order of [`Expression::children`].
    pub fn child(&self, index: usize) -> OrdinalResult<Expression> {
        let len = self.child_count();
        let out_of_range = || OrdinalError::ChildIndexOutOfRange {
            kind: self.type_(),
            index,
            len,
        };
        if index >= len {
            return Err(out_of_range());
        }
        self.children().into_iter().nth(index).ok_or_else(out_of_range)
    }

    /// Rebuild a node of the same kind and head data with new children.
    ///
    /// The node is assembled verbatim; no normalization happens here.
    pub fn with_children(&self, children: impl IntoIterator<Item = Expression>) -> OrdinalResult<Self> {
        let children: Vec<Expression> = children.into_iter().collect();
        let found = children.len();
        let mismatch = |expected: usize| OrdinalError::ArityMismatch {
            kind: self.type_(),
            expected,
            found,
        };

        let node = match self.node() {
            ExprNode::Number(_)
            | ExprNode::Omega
            | ExprNode::OrdinalLabOrdinal
            | ExprNode::Slot(_) => {
                if found != 0 {
                    return Err(mismatch(0));
                }
                return Ok(self.clone());
            }
            ExprNode::Plus(items) => {
                if found != items.len() {
                    return Err(mismatch(items.len()));
                }
                ExprNode::Plus(children)
            }
            ExprNode::Times(items) => {
                if found != items.len() {
                    return Err(mismatch(items.len()));
                }
                ExprNode::Times(children)
            }
            ExprNode::InaccessibleOrdinal { args } => {
                if found != args.len() {
                    return Err(mismatch(args.len()));
                }
                ExprNode::InaccessibleOrdinal { args: children }
            }
            ExprNode::Power { .. } => match <[Expression; 2]>::try_from(children) {
                Ok([base, exponent]) => ExprNode::Power { base, exponent },
                Err(_) => return Err(mismatch(2)),
            },
            ExprNode::AdmissibleOmega { .. } => match <[Expression; 1]>::try_from(children) {
                Ok([subscript]) => ExprNode::AdmissibleOmega { subscript },
                Err(_) => return Err(mismatch(1)),
            },
            ExprNode::OrdinalCollapsingFn { variant, .. } => {
                match <[Expression; 2]>::try_from(children) {
                    Ok([subscript, arg]) => ExprNode::OrdinalCollapsingFn {
                        variant: *variant,
                        subscript,
                        arg,
                    },
                    Err(_) => return Err(mismatch(2)),
                }
            }
            ExprNode::Lambda {
                args, applied_to, ..
            } => {
                let expected = 2 + usize::from(applied_to.is_some());
                if found != expected {
                    return Err(mismatch(expected));
                }
                let mut children = children.into_iter();
                match (children.next(), children.next()) {
                    (Some(body), Some(iterations)) => ExprNode::Lambda {
                        args: args.clone(),
                        body,
                        iterations,
                        applied_to: children.next(),
                    },
                    _ => return Err(mismatch(expected)),
                }
            }
        };
        Ok(Self::new(node))
    }

    /// Heads agree: same kind and same non-child payload.
    pub(crate) fn head_eq(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (ExprNode::Number(a), ExprNode::Number(b)) => a == b,
            (ExprNode::Slot(a), ExprNode::Slot(b)) => a == b,
            (
                ExprNode::OrdinalCollapsingFn { variant: a, .. },
                ExprNode::OrdinalCollapsingFn { variant: b, .. },
            ) => a == b,
            (ExprNode::Lambda { args: a, .. }, ExprNode::Lambda { args: b, .. }) => a[..] == b[..],
            _ => self.type_() == other.type_(),
        }
    }

    /// Same head and pointer-identical children. O(number of children).
    pub(crate) fn shallow_eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.head_eq(other)
            && self.child_count() == other.child_count()
            && self
                .children()
                .iter()
                .zip(other.children().iter())
                .all(|(a, b)| a.ptr_eq(b))
    }
}

impl From<u64> for Expression {
    fn from(value: u64) -> Self {
        Expression::number(value)
    }
}

impl From<BigUint> for Expression {
    fn from(value: BigUint) -> Self {
        Expression::number(value)
    }
}

impl From<SlotId> for Expression {
    fn from(value: SlotId) -> Self {
        Expression::slot(value)
    }
}

impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Expression({self})")
    }
}

impl PartialEq for Expression {
    /// Structural equality over an explicit stack. Expect O(n) in the number of nodes in the
    /// worst case; shared subtrees short-circuit.
    fn eq(&self, other: &Self) -> bool {
        let mut stack: SmallVec<(Expression, Expression), 12> = SmallVec::new();
        stack.push((self.clone(), other.clone()));

        while let Some((a, b)) = stack.pop() {
            if a.ptr_eq(&b) {
                continue;
            }
            if !a.head_eq(&b) || a.child_count() != b.child_count() {
                return false;
            }
            for pair in a.children().into_iter().zip(b.children()) {
                stack.push(pair);
            }
        }

        true
    }
}

impl Eq for Expression {}

/// Moves the children of a node that is being freed onto `pending`.
fn detach_children(node: ExprNode, pending: &mut Vec<Expression>) {
    match node {
        ExprNode::Number(_) | ExprNode::Omega | ExprNode::OrdinalLabOrdinal | ExprNode::Slot(_) => {}
        ExprNode::Plus(items)
        | ExprNode::Times(items)
        | ExprNode::InaccessibleOrdinal { args: items } => pending.extend(items),
        ExprNode::Power { base, exponent } => pending.extend([base, exponent]),
        ExprNode::AdmissibleOmega { subscript } => pending.push(subscript),
        ExprNode::OrdinalCollapsingFn { subscript, arg, .. } => pending.extend([subscript, arg]),
        ExprNode::Lambda {
            body,
            iterations,
            applied_to,
            ..
        } => pending.extend([body, iterations].into_iter().chain(applied_to)),
    }
}

impl Drop for Expression {
    /// Frees uniquely owned subtrees over a heap work-list. Each detached node is left as a
    /// leaf, so the nested drops it triggers return immediately.
    fn drop(&mut self) {
        let Some(node) = Rc::get_mut(&mut self.0) else {
            return;
        };
        if matches!(
            node,
            ExprNode::Number(_) | ExprNode::Omega | ExprNode::OrdinalLabOrdinal | ExprNode::Slot(_)
        ) {
            return;
        }

        let mut pending = Vec::new();
        detach_children(std::mem::replace(node, ExprNode::Omega), &mut pending);
        while let Some(mut expr) = pending.pop() {
            if let Some(node) = Rc::get_mut(&mut expr.0) {
                detach_children(std::mem::replace(node, ExprNode::Omega), &mut pending);
            }
        }
    }
}

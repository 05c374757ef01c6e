//! Hyordinal: a symbolic engine for an ordinal notation.
//!
//! Ordinals below the strength of a weakly inaccessible cardinal are represented as immutable
//! expression trees built from `omega`, admissible levels `Omega[s]`, collapsing functions
//! `BOCF`/`MOCF`, an inaccessible hierarchy `I[...]`, the ordinary arithmetic operators, and
//! explicit iterators. On top of that representation the crate provides:
//!  - canonical forms ([`canonical::evaluate`]),
//!  - a total order by magnitude ([`compare::compare`]),
//!  - fundamental sequences of limit ordinals ([`sequence::fundamental_sequence`]),
//!    successors and predecessors,
//!  - maximization of a value against an index base ([`maximize::maximize`]),
//!  - a textual syntax: [`expr::pretty::stringify`] and [`parser::parse`].
//!
//! Shape
//!  - [`expr::Expression`] is an `Rc` handle; subtrees are shared and never mutated, and every
//!    rewrite copies only the path to the changed nodes.
//!  - Traversals, comparisons and rebuilds use explicit stacks, so deep values do not overflow
//!    the native stack.
//!
//! Example
//! ```
//! use std::cmp::Ordering;
//! use hyordinal::prelude::*;
//!
//! let a = evaluate(&parse("omega^omega + omega*2 + 3").unwrap()).unwrap();
//! let b = evaluate(&parse("omega^omega + omega*3").unwrap()).unwrap();
//! assert_eq!(compare(&a, &b).unwrap(), Ordering::Less);
//!
//! let fs = fundamental_sequence(&b).unwrap();
//! assert_eq!(fs.at(4).unwrap().to_string(), "omega^omega+omega*2+4");
//! ```

/// Canonical forms and per-operator reducers.
pub mod canonical;
/// Magnitude comparison.
pub mod compare;
/// Engine limits, loadable from TOML.
pub mod config;
/// Error types shared by every operation.
pub mod error;
/// Deferred-continuation scheduler used by the comparator.
pub mod evaluator;
/// Expression model: node kinds, builders, accessors, pretty printing.
pub mod expr;
/// Maximization against an index base.
pub mod maximize;
/// Parser for the textual syntax.
pub mod parser;
/// Fundamental sequences, successors, predecessors and substitution.
pub mod sequence;
/// Tree walkers for traversing and rebuilding expressions.
pub mod walker;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::canonical::evaluate;
    pub use crate::compare::{compare, structural_cmp};
    pub use crate::config::EngineConfig;
    pub use crate::error::{OrdinalError, OrdinalResult};
    pub use crate::expr::{
        ExprNode, ExprType, Expression, OcfVariant, SlotId,
        pretty::{PrettyExpr, stringify},
    };
    pub use crate::maximize::{maximize, maximize_one};
    pub use crate::sequence::{
        FundamentalSequence, fundamental_sequence, is_limit_ordinal, predecessor, successor,
    };

    // Walker ergonomics
    pub use crate::walker::{WalkerHandle, WalkerNodeHandle, map_all, walk, walk_no_input};

    // Parser entrypoint
    pub use crate::parser::parse;
}

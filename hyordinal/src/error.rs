use strum::{Display, EnumIs, EnumTryAs};
use thiserror::Error;

use crate::expr::{ExprType, OcfVariant};

/// Operations the notation deliberately leaves undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnsupportedOperation {
    /// Ordering a `BOCF` value against a `MOCF` value.
    #[strum(to_string = "comparison between {lhs} and {rhs} collapsing functions")]
    CrossVariantCollapse { lhs: OcfVariant, rhs: OcfVariant },
}

#[derive(Debug, EnumIs, EnumTryAs, Error)]
pub enum OrdinalError {
    /// A child was requested at an index the node does not have.
    #[error("Child index {index} is out of range for a `{kind}` node with {len} children.")]
    ChildIndexOutOfRange {
        kind: ExprType,
        index: usize,
        len: usize,
    },

    /// A node was rebuilt with the wrong number of children.
    #[error("A `{kind}` node cannot be rebuilt from {found} children (expected {expected}).")]
    ArityMismatch {
        kind: ExprType,
        expected: usize,
        found: usize,
    },

    /// Fundamental sequences only exist for limit ordinals.
    #[error("`{expr}` is not a limit ordinal and has no fundamental sequence.")]
    NotALimitOrdinal { expr: String },

    /// A node of this kind was reached where limit structure was expected.
    #[error("No fundamental sequence rule applies to the `{kind}` node `{expr}`.")]
    NoFundamentalSequence { kind: ExprType, expr: String },

    /// An admissible level with a successor subscript must sit below a collapsing function.
    #[error(
        "`{admissible}` has a successor subscript but no enclosing collapsing function at or below its level."
    )]
    NoCollapsingContext { admissible: String },

    /// The rule being applied needs `expr - 1` but `expr` is zero or a limit.
    #[error("`{expr}` has no predecessor.")]
    MissingPredecessor { expr: String },

    /// The scan for a fundamental sequence term above `expr` ran out of indices.
    #[error(
        "No term among the first {scanned} of the fundamental sequence of `{bound}` exceeds `{expr}`."
    )]
    ScanExhausted {
        bound: String,
        expr: String,
        scanned: u64,
    },

    /// Iterator expansion was asked for more steps than the configured cap.
    #[error("Expanding an iterator {iterations} times exceeds the configured limit of {limit}.")]
    IterationLimitExceeded { iterations: String, limit: u64 },

    /// `maximize` did not reach a fixpoint within the configured number of rounds.
    #[error("Maximization did not settle within {limit} rounds.")]
    RoundLimitExceeded { limit: u64 },

    /// The operation is left undefined by the notation.
    #[error("Unsupported operation: {0}.")]
    Unsupported(UnsupportedOperation),

    /// Engine configuration could not be parsed.
    #[error("Failed to parse engine configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

pub type OrdinalResult<T> = Result<T, OrdinalError>;

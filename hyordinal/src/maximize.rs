//! Maximization against an index base.
//!
//! Given a value `expr` below a limit `bound` and an index base `n`, [`maximize_one`] looks for
//! the tightest limit ordinal containing `expr` whose `n`-th fundamental sequence term still
//! lies below `expr`, descending through fundamental sequences of `bound`. [`maximize`]
//! repeats this step until it no longer moves.
//!
//! ```
//! use hyordinal::maximize::{maximize, maximize_one};
//! use hyordinal::parser::parse;
//!
//! let expr = parse("omega+5").unwrap();
//! let bound = parse("omega^2").unwrap();
//! assert_eq!(maximize_one(&expr, &bound, 3).unwrap().unwrap().to_string(), "omega*2");
//! assert_eq!(maximize(&expr, &bound, 3).unwrap().to_string(), "omega*2");
//! ```
use std::cmp::Ordering;

use log::{debug, trace};

use crate::{
    compare::compare,
    config::EngineConfig,
    error::{OrdinalError, OrdinalResult},
    expr::Expression,
    sequence::{fundamental_sequence, is_limit_ordinal},
};

/// One maximization step. `None` when `expr` cannot be moved up within `bound`.
pub fn maximize_one(
    expr: &Expression,
    bound: &Expression,
    n: u64,
) -> OrdinalResult<Option<Expression>> {
    maximize_one_with(expr, bound, n, &EngineConfig::default())
}

pub fn maximize_one_with(
    expr: &Expression,
    bound: &Expression,
    n: u64,
    config: &EngineConfig,
) -> OrdinalResult<Option<Expression>> {
    if compare(expr, bound)?.is_ge() || !is_limit_ordinal(bound) {
        return Ok(None);
    }

    // First term of the bound's sequence above `expr`; the sequence converges to the bound, so
    // the scan only stops early when a limit is configured.
    let sequence = fundamental_sequence(bound)?;
    let mut index = 0u64;
    let mut bound = loop {
        if config.scan_limit.is_some_and(|limit| index >= limit) {
            return Err(OrdinalError::ScanExhausted {
                bound: bound.to_string(),
                expr: expr.to_string(),
                scanned: index,
            });
        }
        let term = sequence.at_with(index, config)?;
        trace!("scan {bound}[{index}] = {term}");
        if compare(&term, expr)?.is_gt() {
            break term;
        }
        index += 1;
    };

    while is_limit_ordinal(&bound) {
        let sequence = fundamental_sequence(&bound)?;
        let top = sequence.at_with(n, config)?;
        match compare(expr, &top)? {
            Ordering::Equal => return Ok(None),
            Ordering::Greater => {
                debug!("{expr} maximized to {bound} at base {n}");
                return Ok(Some(bound));
            }
            Ordering::Less => {}
        }

        let mut tightened = None;
        for index in 0..=n {
            let term = sequence.at_with(index, config)?;
            trace!("refine {bound}[{index}] = {term}");
            match compare(&term, expr)? {
                Ordering::Equal => return Ok(None),
                Ordering::Greater => {
                    tightened = Some(term);
                    break;
                }
                Ordering::Less => {}
            }
        }
        bound = tightened.ok_or_else(|| OrdinalError::ScanExhausted {
            bound: bound.to_string(),
            expr: expr.to_string(),
            scanned: n.saturating_add(1),
        })?;
        debug!("bound tightened to {bound}");
    }

    Ok(None)
}

/// Repeat [`maximize_one`] from `expr` until it yields `None`, returning the last value.
pub fn maximize(expr: &Expression, bound: &Expression, n: u64) -> OrdinalResult<Expression> {
    maximize_with(expr, bound, n, &EngineConfig::default())
}

pub fn maximize_with(
    expr: &Expression,
    bound: &Expression,
    n: u64,
    config: &EngineConfig,
) -> OrdinalResult<Expression> {
    let mut current = expr.clone();
    let mut rounds = 0u64;
    loop {
        if let Some(limit) = config.max_rounds.filter(|limit| rounds >= *limit) {
            return Err(OrdinalError::RoundLimitExceeded { limit });
        }
        match maximize_one_with(&current, bound, n, config)? {
            Some(next) => {
                current = next;
                rounds += 1;
            }
            None => {
                debug!("maximization of {expr} settled at {current} after {rounds} rounds");
                return Ok(current);
            }
        }
    }
}

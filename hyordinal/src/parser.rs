//! Parser for the textual syntax produced by [`stringify`](crate::expr::pretty::stringify).
//!
//! Role
//! - Turn human-readable notation into an [`Expression`]. The tree is built verbatim; run
//!   [`evaluate`](crate::canonical::evaluate) to normalize it.
//! - Mirrors the precedence and associativity used by the pretty-printer for round-tripping.
//!
//! Accepted syntax (whitespace is allowed between tokens):
//! - Literals: decimal numbers of any size, `omega`, `olo`, slots `#n`.
//! - Operators: `a+b`, `a*b`, `a^b`, by increasing precedence; `+` and `*` are n-ary, `^` is
//!   right-associative. Parentheses group.
//! - `Omega[s]`, `BOCF[s,a]`, `MOCF[s,a]`, `I[a0,a1,...]`.
//! - Iterators: `Lambda[{#t},body,iterations]` or `Lambda[{#t},body,iterations,start]`.
use std::str::FromStr;

use chumsky::{prelude::*, text::digits};
use num_bigint::BigUint;

use crate::expr::{Expression, OcfVariant, SlotId};

fn number_parser<'src>()
-> impl Parser<'src, &'src str, BigUint, extra::Err<Rich<'src, char>>> + Clone {
    digits(10)
        .at_least(1)
        .collect::<String>()
        .try_map(|s, span| {
            BigUint::parse_bytes(s.as_bytes(), 10)
                .ok_or_else(|| Rich::custom(span, format!("invalid decimal number: {s}")))
        })
        .labelled("number")
}

fn slot_parser<'src>() -> impl Parser<'src, &'src str, SlotId, extra::Err<Rich<'src, char>>> + Clone
{
    just('#')
        .ignore_then(digits(10).at_least(1).collect::<String>().try_map(|s, span| {
            s.parse::<u32>()
                .map(SlotId::new)
                .map_err(|err| Rich::custom(span, format!("invalid slot id `{s}`: {err}")))
        }))
        .labelled("slot")
}

/// `[inner]`
fn bracketed<'src, O>(
    inner: impl Parser<'src, &'src str, O, extra::Err<Rich<'src, char>>> + Clone,
) -> impl Parser<'src, &'src str, O, extra::Err<Rich<'src, char>>> + Clone {
    inner.delimited_by(just('[').padded(), just(']').padded())
}

/// Parser for a whole expression, without the end-of-input check.
pub fn expression_parser<'src>()
-> impl Parser<'src, &'src str, Expression, extra::Err<Rich<'src, char>>> + Clone {
    recursive(|expr| {
        let admissible = just("Omega")
            .ignore_then(bracketed(expr.clone()))
            .map(Expression::admissible_omega)
            .labelled("admissible omega");

        let collapse = choice((
            just("BOCF").to(OcfVariant::B),
            just("MOCF").to(OcfVariant::M),
        ))
        .then(bracketed(
            expr.clone()
                .then_ignore(just(',').padded())
                .then(expr.clone()),
        ))
        .map(|(variant, (subscript, arg))| Expression::ocf(variant, subscript, arg))
        .labelled("collapsing function");

        let inaccessible = just("I")
            .ignore_then(bracketed(
                expr.clone()
                    .separated_by(just(',').padded())
                    .at_least(1)
                    .collect::<Vec<_>>(),
            ))
            .map(Expression::inaccessible)
            .labelled("inaccessible");

        let bound_slots = slot_parser()
            .padded()
            .separated_by(just(',').padded())
            .collect::<Vec<_>>()
            .delimited_by(just('{').padded(), just('}').padded());
        let lambda = just("Lambda")
            .ignore_then(bracketed(
                bound_slots
                    .then_ignore(just(',').padded())
                    .then(expr.clone())
                    .then_ignore(just(',').padded())
                    .then(expr.clone())
                    .then(just(',').padded().ignore_then(expr.clone()).or_not()),
            ))
            .map(|(((args, body), iterations), start)| {
                Expression::lambda(args, body, iterations, start)
            })
            .labelled("iterator");

        let parenthesized = expr
            .clone()
            .delimited_by(just('(').padded(), just(')').padded())
            .labelled("parentheses");

        let atom = choice((
            number_parser().map(Expression::number),
            slot_parser().map(Expression::slot),
            just("omega").to(Expression::omega()),
            just("olo").to(Expression::olo()),
            admissible,
            collapse,
            inaccessible,
            lambda,
            parenthesized,
        ))
        .padded()
        .labelled("atom");

        // `^` binds tightest and associates to the right.
        let power = atom
            .clone()
            .then_ignore(just('^').padded())
            .repeated()
            .foldr(atom, Expression::power)
            .labelled("power");

        let product = power
            .separated_by(just('*').padded())
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|factors| match <[Expression; 1]>::try_from(factors) {
                Ok([single]) => single,
                Err(factors) => Expression::times(factors),
            })
            .labelled("product");

        product
            .separated_by(just('+').padded())
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|terms| match <[Expression; 1]>::try_from(terms) {
                Ok([single]) => single,
                Err(terms) => Expression::plus(terms),
            })
            .labelled("sum")
    })
}

/// Parse an expression.
///
/// Returns the tree exactly as written, or `Err(Vec<String>)` with human-readable diagnostics.
///
/// ```
/// use hyordinal::parser::parse;
/// use hyordinal::expr::ExprType;
///
/// let e = parse("BOCF[Omega[1], omega^(omega+1)]").unwrap();
/// assert_eq!(e.type_(), ExprType::OrdinalCollapsingFn);
/// assert_eq!(e.to_string(), "BOCF[Omega[1],omega^(omega+1)]");
/// assert!(parse("omega +").is_err());
/// ```
pub fn parse(src: &str) -> Result<Expression, Vec<String>> {
    let (expr, errs) = expression_parser()
        .then_ignore(end())
        .parse(src)
        .into_output_errors();
    let errors: Vec<String> = errs
        .into_iter()
        .map(|e| format!("parse error: {e}"))
        .collect();

    match expr {
        Some(expr) if errors.is_empty() => Ok(expr),
        _ => Err(errors),
    }
}

impl FromStr for Expression {
    type Err = Vec<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

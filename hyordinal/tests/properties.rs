use std::cmp::Ordering;

use hyordinal::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn leaf(rng: &mut ChaCha20Rng) -> Expression {
    match rng.random_range(0..4) {
        0 => Expression::from(rng.random_range(0..5u64)),
        1 => Expression::omega(),
        2 => Expression::admissible_omega(Expression::from(rng.random_range(1..3u64))),
        _ => Expression::inaccessible(vec![Expression::from(rng.random_range(0..2u64))]),
    }
}

fn random_raw(rng: &mut ChaCha20Rng, depth: u32) -> Expression {
    if depth == 0 || rng.random_bool(0.25) {
        return leaf(rng);
    }
    match rng.random_range(0..6) {
        0 => {
            let n = rng.random_range(2..4);
            Expression::plus((0..n).map(|_| random_raw(rng, depth - 1)).collect())
        }
        1 => {
            let n = rng.random_range(2..4);
            Expression::times((0..n).map(|_| random_raw(rng, depth - 1)).collect())
        }
        2 => Expression::power(Expression::omega(), random_raw(rng, depth - 1)),
        3 => {
            let base = Expression::from(rng.random_range(2..4u64));
            Expression::power(base, random_raw(rng, depth - 1))
        }
        4 => {
            // Successor levels only, so the collapse always has a level below it.
            let level = Expression::admissible_omega(Expression::from(rng.random_range(1..4u64)));
            Expression::ocf(OcfVariant::B, level, random_raw(rng, depth - 1))
        }
        _ => Expression::admissible_omega(random_raw(rng, depth - 1)),
    }
}

fn samples(seed: u64, count: usize) -> Vec<Expression> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let raw = random_raw(&mut rng, 3);
            evaluate(&raw).unwrap_or_else(|err| panic!("evaluating {raw} failed: {err}"))
        })
        .collect()
}

#[test]
fn evaluation_is_idempotent() {
    for x in samples(0x42, 200) {
        let again = evaluate(&x).unwrap();
        assert_eq!(again, x, "{x} changed on re-evaluation to {again}");
    }
}

#[test]
fn comparison_is_reflexive_and_antisymmetric() {
    let xs = samples(0x43, 40);
    for a in &xs {
        assert_eq!(compare(a, a).unwrap(), Ordering::Equal);
        for b in &xs {
            let ab = compare(a, b).unwrap();
            let ba = compare(b, a).unwrap();
            assert_eq!(ab, ba.reverse(), "{a} vs {b}");
        }
    }
}

#[test]
fn structural_order_matches_equality() {
    let xs = samples(0x44, 40);
    for a in &xs {
        for b in &xs {
            assert_eq!(structural_cmp(a, b).is_eq(), a == b, "{a} vs {b}");
            assert_eq!(structural_cmp(a, b), structural_cmp(b, a).reverse());
        }
    }
}

#[test]
fn successor_is_above_and_predecessor_undoes_it() {
    for x in samples(0x45, 200) {
        let next = successor(&x);
        assert_eq!(compare(&x, &next).unwrap(), Ordering::Less, "{x} < {next}");
        assert!(!is_limit_ordinal(&next));
        assert_eq!(predecessor(&next).as_ref(), Some(&x), "pred({next})");
    }
}

#[test]
fn printed_form_parses_back() {
    for x in samples(0x46, 200) {
        let printed = stringify(&x);
        let reparsed = parse(&printed).unwrap_or_else(|errs| panic!("{printed}: {errs:?}"));
        assert_eq!(reparsed, x, "{printed}");
        assert_eq!(compare(&reparsed, &x).unwrap(), Ordering::Equal);
    }
}

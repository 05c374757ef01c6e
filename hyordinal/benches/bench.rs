use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hyordinal::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn build_simple_expr() -> Expression {
    // omega^omega + omega*2 + 3
    parse("omega^omega+omega*2+3").unwrap()
}

fn build_complex_expr(seed: u64) -> Expression {
    // Medium-sized canonical expression; seeded for determinism.
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    fn next_create(budget: usize, rng: &mut impl Rng) -> Expression {
        if budget == 0 || rng.random_bool(0.2) {
            return match rng.random_range(0..=3) {
                0 => Expression::from(rng.random_range(1..10u64)),
                1 => Expression::omega(),
                2 => Expression::admissible_omega(Expression::from(rng.random_range(1..4u64))),
                3 => Expression::inaccessible(vec![Expression::from(rng.random_range(0..3u64))]),
                _ => unreachable!(),
            };
        }

        match rng.random_range(0..=4) {
            0 => {
                let left = next_create(budget - 1, rng);
                let right = next_create(budget - 1, rng);
                Expression::plus(vec![left, right])
            }
            1 => {
                let left = next_create(budget - 1, rng);
                let right = next_create(budget - 1, rng);
                Expression::times(vec![left, right])
            }
            2 => Expression::power(Expression::omega(), next_create(budget - 1, rng)),
            3 => {
                let level = Expression::admissible_omega(Expression::from(rng.random_range(1..4u64)));
                Expression::ocf(OcfVariant::B, level, next_create(budget - 1, rng))
            }
            4 => Expression::admissible_omega(next_create(budget - 1, rng)),
            _ => unreachable!(),
        }
    }

    let raw = next_create(8, &mut rng);
    evaluate(&raw).unwrap()
}

fn build_tower(depth: usize) -> Expression {
    let mut acc = Expression::one();
    for _ in 0..depth {
        acc = Expression::power(Expression::omega(), acc);
    }
    acc
}

fn bench_compare(c: &mut Criterion) {
    let a = build_complex_expr(0x42);
    let b = build_complex_expr(0x43);

    c.bench_function("compare_complex", |bench| {
        bench.iter(|| {
            black_box(compare(&a, &b).unwrap());
        })
    });

    // Two towers built separately so no pointer shortcut applies.
    let lhs = build_tower(1_000);
    let rhs = build_tower(1_000);
    c.bench_function("compare_deep_tower", |bench| {
        bench.iter(|| {
            black_box(compare(&lhs, &rhs).unwrap());
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let simple = build_simple_expr();
    c.bench_function("evaluate_simple", |b| {
        b.iter(|| {
            black_box(evaluate(&simple).unwrap());
        })
    });

    let raw = parse("omega+omega+omega*omega+BOCF[Omega[2],omega^omega+1]*omega").unwrap();
    c.bench_function("evaluate_merges", |b| {
        b.iter(|| {
            black_box(evaluate(&raw).unwrap());
        })
    });
}

fn bench_fundamental_sequence(c: &mut Criterion) {
    let cnf = build_simple_expr();
    let limit = parse("omega^omega+omega*3").unwrap();
    let collapse = parse("BOCF[Omega[1],Omega[1]]").unwrap();

    c.bench_function("fs_derive_cnf", |b| {
        b.iter(|| {
            black_box(fundamental_sequence(&limit).unwrap());
        })
    });

    let fs = fundamental_sequence(&collapse).unwrap();
    c.bench_function("fs_expand_collapse_8", |b| {
        b.iter(|| {
            black_box(fs.at(8).unwrap());
        })
    });

    c.bench_function("maximize_cnf", |b| {
        b.iter(|| {
            black_box(maximize(&cnf, &limit, 3).unwrap());
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let complex = build_complex_expr(0x44);

    c.bench_function("walk_count_complex", |b| {
        b.iter(|| {
            let mut count = 0usize;

            walk_no_input(&complex, |node| {
                node.schedule_children(());
                count += 1;
            });

            black_box(count);
        });
    });

    c.bench_function("stringify_complex", |b| {
        b.iter(|| {
            black_box(stringify(&complex));
        })
    });
}

criterion_group!(
    benches,
    bench_compare,
    bench_evaluate,
    bench_fundamental_sequence,
    bench_walk,
);
criterion_main!(benches);

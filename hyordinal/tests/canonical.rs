use hyordinal::canonical::{evaluate, evaluate_inaccessible, evaluate_plus, evaluate_times};
use hyordinal::expr::{ExprType, Expression};
use hyordinal::parser::parse;

fn raw(src: &str) -> Expression {
    parse(src).expect("parse should succeed")
}

fn canonical(src: &str) -> String {
    evaluate(&raw(src))
        .expect("evaluation should succeed")
        .to_string()
}

#[test]
fn sums_drop_zero_and_add_literals() {
    let e = Expression::plus(vec![5u64.into(), 0u64.into(), 3u64.into()]);
    assert_eq!(evaluate(&e).unwrap(), Expression::from(8u64));
    assert_eq!(canonical("0+0"), "0");
    assert_eq!(canonical("0+omega"), "omega");
}

#[test]
fn non_adjacent_terms_are_kept_apart() {
    let e = raw("omega+1+omega+2");
    let out = evaluate(&e).unwrap();
    assert_eq!(out, e);
    // Nothing changed, so the original node is reused.
    assert!(out.ptr_eq(&e));
}

#[test]
fn adjacent_similar_terms_merge() {
    assert_eq!(canonical("omega+omega"), "omega*2");
    assert_eq!(canonical("omega*2+omega"), "omega*3");
    assert_eq!(canonical("omega^2*3+omega^2"), "omega^2*4");
    assert_eq!(canonical("Omega[1]+Omega[1]+1"), "Omega[1]*2+1");
}

#[test]
fn nested_sums_are_flattened() {
    let e = Expression::plus(vec![
        Expression::omega(),
        Expression::plus(vec![Expression::one(), Expression::omega()]),
    ]);
    let out = evaluate(&e).unwrap();
    assert_eq!(out.type_(), ExprType::Plus);
    assert_eq!(out.child_count(), 3);
    assert_eq!(out.to_string(), "omega+1+omega");
}

#[test]
fn products() {
    assert_eq!(canonical("2*3"), "6");
    assert_eq!(canonical("omega*0*omega"), "0");
    assert_eq!(canonical("1*omega*1"), "omega");
    assert_eq!(canonical("omega*omega"), "omega^2");
    assert_eq!(canonical("omega^2*omega^3"), "omega^5");
    assert_eq!(canonical("omega*(2*3)"), "omega*6");
    assert_eq!(canonical("(omega+1)*omega"), "(omega+1)*omega");
}

#[test]
fn products_of_plain_values() {
    assert_eq!(evaluate_times(Vec::new()), Expression::one());
    assert_eq!(
        evaluate_times([Expression::omega(), Expression::one()]),
        Expression::omega()
    );
    assert_eq!(evaluate_plus(Vec::new()), Expression::zero());
}

#[test]
fn powers() {
    assert_eq!(canonical("omega^0"), "1");
    assert_eq!(canonical("omega^1"), "omega");
    assert_eq!(canonical("1^omega"), "1");
    assert_eq!(canonical("0^omega"), "0");
    assert_eq!(canonical("2^10"), "1024");
    assert_eq!(canonical("omega^omega"), "omega^omega");
}

#[test]
fn huge_literal_powers_stay_symbolic() {
    assert_eq!(canonical("2^100000000"), "2^100000000");
}

#[test]
fn omega_absorbs_into_fixed_points() {
    assert_eq!(canonical("omega^Omega[1]"), "Omega[1]");
    assert_eq!(canonical("omega^I[1]"), "I[1]");
    assert_eq!(
        canonical("omega^MOCF[Omega[1],omega]"),
        "MOCF[Omega[1],omega]"
    );
    assert_eq!(
        canonical("omega^(Omega[1]^2)"),
        "omega^omega^(Omega[1]*2)"
    );
}

#[test]
fn admissible_levels() {
    assert_eq!(canonical("Omega[0]"), "omega");
    assert_eq!(canonical("Omega[2]"), "Omega[2]");
    assert_eq!(canonical("Omega[I[1]]"), "I[1]");
    assert_eq!(canonical("Omega[1+1]"), "Omega[2]");
}

#[test]
fn inaccessibles_lose_trailing_zeros() {
    assert_eq!(canonical("I[omega,0,0]"), "I[omega]");
    assert_eq!(canonical("I[0,0]"), "I[0]");
    assert_eq!(canonical("I[0,1]"), "I[0,1]");
    assert_eq!(evaluate_inaccessible(Vec::new()).to_string(), "I[0]");
}

#[test]
fn b_collapse_below_its_subscript() {
    assert_eq!(canonical("BOCF[Omega[1],0]"), "1");
    assert_eq!(canonical("BOCF[Omega[1],omega]"), "omega^omega");
    assert_eq!(canonical("BOCF[Omega[2],5]"), "Omega[1]*omega^5");
    assert_eq!(canonical("BOCF[Omega[1],Omega[1]]"), "BOCF[Omega[1],Omega[1]]");
}

#[test]
fn m_collapse_never_reduces() {
    assert_eq!(canonical("MOCF[Omega[1],0]"), "MOCF[Omega[1],0]");
    assert_eq!(canonical("MOCF[Omega[2],5]"), "MOCF[Omega[2],5]");
}

#[test]
fn b_collapse_needs_a_successor_level() {
    let err = evaluate(&raw("BOCF[Omega[omega],0]")).unwrap_err();
    assert!(err.is_missing_predecessor());
}

#[test]
fn iterators_are_not_reduced() {
    assert_eq!(
        canonical("Lambda[{#1},omega^#1,#0,1+0]"),
        "Lambda[{#1},omega^#1,#0,1]"
    );
    assert_eq!(canonical("#3"), "#3");
}

#[test]
fn evaluation_is_idempotent() {
    for src in [
        "omega+omega+1",
        "omega*omega*2+omega",
        "BOCF[Omega[2],omega+1]*omega",
        "omega^(Omega[1]^2)",
        "I[Omega[omega],0,1]+I[1]",
        "(omega+1)^omega",
    ] {
        let once = evaluate(&raw(src)).unwrap();
        let twice = evaluate(&once).unwrap();
        assert_eq!(once, twice, "evaluate is not idempotent on {src}");
    }
}

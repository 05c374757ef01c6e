use hyordinal::config::EngineConfig;
use hyordinal::expr::Expression;
use hyordinal::maximize::{maximize, maximize_one, maximize_one_with, maximize_with};
use hyordinal::parser::parse;

fn e(src: &str) -> Expression {
    parse(src).expect("parse should succeed")
}

fn one_step(expr: &str, bound: &str, n: u64) -> Option<String> {
    maximize_one(&e(expr), &e(bound), n)
        .expect("maximization should succeed")
        .map(|e| e.to_string())
}

#[test]
fn finite_value_under_omega_stays() {
    assert_eq!(one_step("3", "omega", 5), None);
}

#[test]
fn value_at_or_above_bound_stays() {
    assert_eq!(one_step("omega^2", "omega", 3), None);
    assert_eq!(one_step("omega", "omega", 3), None);
}

#[test]
fn successor_bound_stays() {
    assert_eq!(one_step("5", "omega+1", 3), None);
}

#[test]
fn steps_up_to_the_tightest_limit() {
    assert_eq!(
        one_step("omega+5", "omega^2", 3).as_deref(),
        Some("omega*2")
    );
    assert_eq!(one_step("5", "omega*2", 3).as_deref(), Some("omega"));
}

#[test]
fn values_below_the_base_term_stay() {
    assert_eq!(one_step("2", "omega^2", 3), None);
}

#[test]
fn repeats_until_settled() {
    assert_eq!(
        maximize(&e("omega+5"), &e("omega^2"), 3).unwrap().to_string(),
        "omega*2"
    );
    assert_eq!(
        maximize(&e("5"), &e("omega*2"), 3).unwrap().to_string(),
        "omega"
    );
    assert_eq!(maximize(&e("3"), &e("omega"), 5).unwrap().to_string(), "3");
}

#[test]
fn initial_scan_honours_its_limit() {
    let config = EngineConfig {
        scan_limit: Some(2),
        ..Default::default()
    };
    let err = maximize_one_with(&e("omega+5"), &e("omega^2"), 3, &config).unwrap_err();
    assert!(err.is_scan_exhausted());

    let config = EngineConfig {
        scan_limit: Some(3),
        ..Default::default()
    };
    let out = maximize_one_with(&e("omega+5"), &e("omega^2"), 3, &config).unwrap();
    assert_eq!(out.unwrap().to_string(), "omega*2");
}

#[test]
fn rounds_are_capped() {
    let config = EngineConfig {
        max_rounds: Some(1),
        ..Default::default()
    };
    let err = maximize_with(&e("omega+5"), &e("omega^2"), 3, &config).unwrap_err();
    assert!(err.is_round_limit_exceeded());

    // A zero cap fails before the first round, even for a value that would not move.
    let config = EngineConfig {
        max_rounds: Some(0),
        ..Default::default()
    };
    let err = maximize_with(&e("3"), &e("omega"), 5, &config).unwrap_err();
    assert!(err.is_round_limit_exceeded());
}

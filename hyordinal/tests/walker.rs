use std::cell::Cell;

use hyordinal::error::OrdinalError;
use hyordinal::expr::{Expression, SlotId};
use hyordinal::parser::parse;
use hyordinal::walker::{map_all, max_slot_id, walk, walk_no_input};

fn e(src: &str) -> Expression {
    parse(src).expect("parse should succeed")
}

fn kinds_in_order(expr: &Expression) -> Vec<String> {
    let mut out = Vec::new();
    walk_no_input(expr, |node| {
        out.push(node.type_().to_string());
        node.schedule_children(());
    });
    out
}

#[test]
fn walk_counts_nodes_small() {
    let mut count = 0usize;
    walk_no_input(&e("omega^omega+Omega[1]*2"), |node| {
        node.schedule_children(());
        count += 1;
    });
    // plus, power, omega, omega, times, Omega[..], 1, 2
    assert_eq!(count, 8);
}

#[test]
fn walk_handles_deep_chains() {
    let mut expr = Expression::one();
    for _ in 0..2_000 {
        expr = Expression::power(Expression::omega(), expr);
    }
    let mut count = 0usize;
    walk_no_input(&expr, |node| {
        node.schedule_children(());
        count += 1;
    });
    assert_eq!(count, 4_001);
}

#[test]
fn children_are_visited_depth_first_left_to_right() {
    let expr = e("omega*2+omega^3");
    assert_eq!(
        kinds_in_order(&expr),
        ["plus", "times", "omega", "number", "power", "omega", "number"]
    );
}

#[test]
fn pruned_children_are_skipped() {
    let mut visited = Vec::new();
    walk_no_input(&e("omega^omega+Omega[1]*2"), |node| {
        visited.push(node.type_().to_string());
        for child in node.children() {
            if !child.type_().is_power() {
                child.schedule_visit(());
            }
        }
    });
    assert_eq!(visited, ["plus", "times", "omega-n", "number", "number"]);
}

#[test]
fn inputs_thread_depth() {
    let mut deepest = 0usize;
    walk(&e("BOCF[Omega[1],omega^(omega+1)]"), 0usize, |depth, node| {
        deepest = deepest.max(depth);
        node.schedule_children(depth + 1);
    });
    // ocf -> power -> plus -> omega
    assert_eq!(deepest, 3);
}

#[test]
fn break_stops_pending_visits() {
    let mut visited = 0usize;
    walk(&e("omega+omega+omega+omega"), true, |is_root, node| {
        visited += 1;
        if is_root {
            node.schedule_children(false);
        } else {
            node.break_();
        }
    });
    assert_eq!(visited, 2);
}

#[test]
fn map_all_identity_reuses_the_tree() {
    let expr = e("omega^omega+BOCF[Omega[1],omega]*3");
    let out = map_all(&expr, |node, rebuilt| {
        assert!(!rebuilt);
        Ok(node)
    })
    .unwrap();
    assert!(out.ptr_eq(&expr));
}

#[test]
fn map_all_copies_only_the_changed_path() {
    let expr = e("omega^omega+Omega[1]");
    let out = map_all(&expr, |node, _| {
        Ok(if node.is_one() {
            Expression::from(2u64)
        } else {
            node
        })
    })
    .unwrap();
    assert_eq!(out.to_string(), "omega^omega+Omega[2]");
    assert!(!out.ptr_eq(&expr));
    assert!(out.child(0).unwrap().ptr_eq(&expr.child(0).unwrap()));
}

#[test]
fn map_all_visits_shared_subtrees_once() {
    let shared = Expression::power(Expression::omega(), Expression::omega());
    let expr = Expression::plus(vec![shared.clone(), shared]);
    let calls = Cell::new(0usize);
    let out = map_all(&expr, |node, _| {
        calls.set(calls.get() + 1);
        Ok(node)
    })
    .unwrap();
    // plus, power and its two omegas
    assert_eq!(calls.get(), 4);
    assert!(out.ptr_eq(&expr));
}

#[test]
fn map_all_propagates_errors() {
    let err = map_all(&e("1+Omega[omega]"), |node, _| {
        if node.type_().is_omega() {
            return Err(OrdinalError::MissingPredecessor {
                expr: node.to_string(),
            });
        }
        Ok(node)
    })
    .unwrap_err();
    assert!(err.is_missing_predecessor());
}

#[test]
fn max_slot_ids() {
    assert_eq!(max_slot_id(&e("omega+1")), None);
    assert_eq!(max_slot_id(&e("#4+#2")), Some(SlotId::new(4)));
    assert_eq!(max_slot_id(&e("Lambda[{#9},#1,#0]")), Some(SlotId::new(9)));
}

#[test]
fn child_access_is_checked() {
    let expr = e("omega^2");
    assert_eq!(expr.child_count(), 2);
    assert!(expr.child(2).unwrap_err().is_child_index_out_of_range());
    assert!(
        expr.with_children([Expression::omega()])
            .unwrap_err()
            .is_arity_mismatch()
    );
    let swapped = expr
        .with_children([Expression::from(2u64), Expression::omega()])
        .unwrap();
    assert_eq!(swapped.to_string(), "2^omega");
}

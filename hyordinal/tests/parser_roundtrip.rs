use hyordinal::expr::pretty::{PrettyExpr, stringify};
use hyordinal::expr::{ExprType, Expression, OcfVariant, SlotId};
use hyordinal::parser::parse;

fn roundtrip(src: &str) {
    let parsed = parse(src).expect("parse should succeed");
    let printed = stringify(&parsed);
    assert_eq!(printed, src, "printing did not reproduce the source");
    let reparsed = parse(&printed).expect("printed text should parse");
    assert_eq!(reparsed, parsed);
}

#[test]
fn literals() {
    roundtrip("0");
    roundtrip("42");
    roundtrip("123456789012345678901234567890");
    roundtrip("omega");
    roundtrip("olo");
    roundtrip("#7");
}

#[test]
fn arithmetic() {
    roundtrip("omega+1");
    roundtrip("omega*2+3");
    roundtrip("omega^omega+omega^2*5+omega+1");
    roundtrip("(omega+1)*omega");
    roundtrip("omega^(omega+1)");
    roundtrip("omega^(omega*2)");
    roundtrip("omega^omega^omega");
    roundtrip("(omega^omega)^omega");
    roundtrip("(omega*2)^omega");
}

#[test]
fn bracketed_forms() {
    roundtrip("Omega[1]");
    roundtrip("Omega[omega+1]");
    roundtrip("BOCF[Omega[1],omega^(omega+1)]");
    roundtrip("MOCF[Omega[2],Omega[2]*omega]");
    roundtrip("I[0]");
    roundtrip("I[1,omega,Omega[1]+1]");
    roundtrip("Lambda[{#1},omega^#1,#0]");
    roundtrip("Lambda[{#1},BOCF[Omega[1],#1],#0,0]");
    roundtrip("Lambda[{#1,#2},#1+#2,3,omega]");
}

#[test]
fn nested_sums_and_products_keep_their_shape() {
    let nested = Expression::plus(vec![
        Expression::omega(),
        Expression::plus(vec![Expression::one(), Expression::omega()]),
    ]);
    assert_eq!(stringify(&nested), "omega+(1+omega)");
    assert_eq!(parse("omega+(1+omega)").unwrap(), nested);

    let nested = Expression::times(vec![
        Expression::times(vec![Expression::omega(), Expression::omega()]),
        Expression::from(2u64),
    ]);
    assert_eq!(stringify(&nested), "(omega*omega)*2");
    roundtrip("(omega*omega)*2");
}

#[test]
fn precedence_and_associativity() {
    let e = parse("omega+omega*2^3").unwrap();
    assert_eq!(e.type_(), ExprType::Plus);
    let product = e.child(1).unwrap();
    assert_eq!(product.type_(), ExprType::Times);
    assert_eq!(product.child(1).unwrap().type_(), ExprType::Power);

    // `^` is right-associative.
    let tower = parse("2^3^2").unwrap();
    assert_eq!(tower.child(0).unwrap(), Expression::from(2u64));
    assert_eq!(tower.child(1).unwrap().type_(), ExprType::Power);

    // `+` and `*` are n-ary.
    assert_eq!(parse("1+2+3").unwrap().child_count(), 3);
    assert_eq!(parse("omega*omega*omega").unwrap().child_count(), 3);
}

#[test]
fn whitespace_is_ignored() {
    let spaced = parse(" BOCF [ Omega[ 1 ] , omega ^ ( omega + 1 ) ] ").unwrap();
    let tight = parse("BOCF[Omega[1],omega^(omega+1)]").unwrap();
    assert_eq!(spaced, tight);

    let lambda = parse("Lambda[ { #1 } , omega ^ #1 , #0 , 1 ]").unwrap();
    assert_eq!(lambda.to_string(), "Lambda[{#1},omega^#1,#0,1]");
}

#[test]
fn built_values_match_parsed_ones() {
    let built = Expression::ocf(
        OcfVariant::M,
        Expression::admissible_omega(Expression::one()),
        Expression::lambda(
            [SlotId::new(1)],
            Expression::admissible_omega(Expression::slot(SlotId::new(1))),
            Expression::slot(SlotId::new(0)),
            Some(Expression::one()),
        ),
    );
    let parsed: Expression = "MOCF[Omega[1],Lambda[{#1},Omega[#1],#0,1]]".parse().unwrap();
    assert_eq!(built, parsed);
}

#[test]
fn malformed_input_is_rejected() {
    for src in [
        "",
        "omega +",
        "Omega[1",
        "BOCF[Omega[1]]",
        "QOCF[Omega[1],0]",
        "I[]",
        "#",
        "omega omega",
        "(omega",
    ] {
        let errors = parse(src).expect_err(src);
        assert!(!errors.is_empty(), "{src:?} produced no diagnostics");
        assert!(errors.iter().all(|e| e.starts_with("parse error: ")));
    }
}

#[test]
fn pretty_rendering_has_no_colors_on_plain_writers() {
    let e = parse("omega^omega+Omega[1]").unwrap();
    let mut out = termcolor::NoColor::new(Vec::new());
    e.pretty_render_to(80, &mut out).unwrap();
    assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "omega^omega+Omega[1]");
    assert_eq!(e.pretty_string(), stringify(&e));
}

// Language Compliance Tests
//
// End-to-end checks of the documented behavior of the predicate language:
// round-tripping, type rules, set algebra, existentials, SQL output,
// containment shapes and input rejection.

use ledger_query::{
    compile, evaluate, matching_shapes, parse, schema, sum_by, Config, Error, MapEnv, Set,
};
use serde_json::{json, Value as JsonValue};

fn eval_set(text: &str, doc: &JsonValue) -> Set {
    let env = MapEnv::from_value(doc).unwrap();
    evaluate(&env, &parse(text).unwrap()).unwrap()
}

// ============================================================================
// Section: Round-trip
// ============================================================================

#[test]
fn spec_render_round_trips() {
    let predicates = [
        "",
        "is_local",
        "asset_alias = 'gold'",
        "amount >= 0x10",
        "a = 1 AND b = 2 OR c = 3 AND d = 4",
        "(a = 1 OR b = 2) AND c = 3",
        "a = 1 AND (b = 2 OR c = 3)",
        "((a = 1))",
        "reference_data.invoice.id = $1",
        "inputs(asset_alias = $1 AND amount > $2) OR outputs(account_tags.type = 'x')",
        "a != 'x' AND b < 1 AND c <= 2 AND d > 3 AND e >= 4",
        "is_local = $1 = $2",
        "x   =\t'  spaced  '",
        "a = 1 and b = 2 Or c = 3",
    ];
    for text in predicates {
        let first = parse(text).unwrap().render();
        let second = parse(&first).unwrap().render();
        assert_eq!(first, second, "input: {text}");
    }
}

#[test]
fn spec_hex_renders_as_decimal() {
    assert_eq!(parse("amount = 0xff").unwrap().render(), "amount = 255");
}

#[test]
fn spec_keywords_render_upper_case() {
    assert_eq!(parse("a and b or c").unwrap().render(), "a AND b OR c");
}

// ============================================================================
// Section: Type Checker Soundness
// ============================================================================

#[test]
fn spec_type_checker_soundness() {
    assert!(parse("1 = 'hello world'").is_err());
    assert!(compile(
        &parse("is_local").unwrap(),
        &schema::outputs(),
        &[]
    )
    .is_ok());
    assert!(parse("inputs('hello')").is_err());
}

#[test]
fn spec_selector_path_types_are_consistent() {
    assert!(matches!(
        parse("reference_data.n = 1 OR reference_data.n = 'one'"),
        Err(Error::Type { .. })
    ));
    assert!(parse("reference_data.n = 1 OR reference_data.n > 5").is_ok());
}

// ============================================================================
// Section: Set Algebra
// ============================================================================

#[test]
fn spec_set_algebra_laws() {
    let doc = json!({
        "x": "1",
        "inputs": [{"a": "1"}, {"a": "2"}],
        "outputs": [{"a": "2"}, {"a": "3"}]
    });
    let parts = ["inputs(a = $1)", "outputs(a = $1)", "x != $1", "x = $1", "x = '1'"];
    for a in parts {
        for b in parts {
            let sa = eval_set(a, &doc);
            let sb = eval_set(b, &doc);
            assert_eq!(eval_set(&format!("{a} AND {b}"), &doc), sa.intersect(&sb), "{a} AND {b}");
            assert_eq!(eval_set(&format!("{a} OR {b}"), &doc), sa.union(&sb), "{a} OR {b}");
        }
        let s = eval_set(a, &doc);
        assert_eq!(s.complement().complement(), s);
    }
}

// ============================================================================
// Section: Existential Semantics
// ============================================================================

#[test]
fn spec_existential_semantics() {
    let doc = json!({"inputs": [{"a": 1}, {"a": 2}]});
    assert_eq!(eval_set("inputs(a = 1)", &doc), Set::all());
    assert_eq!(eval_set("inputs(a = 3)", &doc), Set::none());
    assert_eq!(eval_set("inputs(a = $1)", &doc), Set::of(["1", "2"]));
}

// ============================================================================
// Section: SQL Determinism
// ============================================================================

#[test]
fn spec_sql_determinism() {
    let predicate = parse("asset_id = $1").unwrap();
    let values = [json!("0011")];
    let first = compile(&predicate, &schema::outputs(), &values).unwrap();
    let second = compile(&predicate, &schema::outputs(), &values).unwrap();
    assert_eq!(first.sql, r#"encode(out."asset_id", 'hex') = $1"#);
    assert_eq!(first.values.len(), 1);
    assert_eq!(first, second);
}

// ============================================================================
// Section: JSONB Matching
// ============================================================================

#[test]
fn spec_jsonb_matching() {
    let or = parse("a = 'abc' OR b = 'xyz'").unwrap();
    assert_eq!(
        matching_shapes(or.expr.as_ref().unwrap(), &[]).unwrap(),
        vec![json!({"a": "abc"}), json!({"b": "xyz"})]
    );
    let and = parse("a = 'abc' AND b = 'xyz'").unwrap();
    assert_eq!(
        matching_shapes(and.expr.as_ref().unwrap(), &[]).unwrap(),
        vec![json!({"a": "abc", "b": "xyz"})]
    );
}

// ============================================================================
// Section: Missing-field Tolerance
// ============================================================================

#[test]
fn spec_missing_field_tolerance() {
    let env_doc = json!({});
    let env = MapEnv::from_value(&env_doc).unwrap();
    let result = evaluate(&env, &parse("foo = 'bar'").unwrap());
    assert_eq!(result, Ok(Set::none()));
}

// ============================================================================
// Section: Invalid-input Rejection
// ============================================================================

#[test]
fn spec_invalid_input_rejection() {
    for text in [
        "123!",
        "INPUTS()",
        "0000124",
        "'unterminated",
        "'back\\slash'",
        "a = $0",
        "a = $",
        "a = 'x' AND",
        "a = = 1",
        "(a = 1",
        "a = 1)",
        "a = 1.5",
    ] {
        assert!(parse(text).is_err(), "accepted invalid input {text:?}");
    }
}

#[test]
fn spec_out_of_range_placeholder_fails_compilation() {
    let p = parse("asset_alias = $3").unwrap();
    assert_eq!(p.parameters, 3);
    assert!(matches!(
        compile(&p, &schema::outputs(), &[json!("a"), json!("b")]),
        Err(Error::Compile { .. })
    ));
}

#[test]
fn spec_errors_carry_offsets() {
    assert_eq!(parse("a = 'x' AND !").unwrap_err().position(), Some(12));
    assert_eq!(parse("a = 1 1").unwrap_err().position(), Some(6));
    assert_eq!(parse("1 = 'x'").unwrap_err().position(), None);
}

// ============================================================================
// Section: Concurrency
// ============================================================================

#[test]
fn spec_predicate_shared_across_threads() {
    let predicate = std::sync::Arc::new(parse("inputs(a = $1)").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let predicate = predicate.clone();
            std::thread::spawn(move || {
                let doc = json!({"inputs": [{"a": i}]});
                let env = MapEnv::from_value(&doc).unwrap();
                evaluate(&env, &predicate).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Set::of([i.to_string()]));
    }
}

// ============================================================================
// Section: Balances and Configuration
// ============================================================================

#[test]
fn spec_sum_by_balances() {
    let outputs = [
        json!({"asset_alias": "gold", "account_tags": {"type": "a"}, "amount": 5}),
        json!({"asset_alias": "gold", "account_tags": {"type": "b"}, "amount": 2}),
        json!({"asset_alias": "gold", "account_tags": {"type": "a"}, "amount": 1}),
        json!({"asset_alias": "silver", "amount": 9}),
    ];
    let balances = sum_by(&outputs, &["asset_alias", "account_tags.type"]).unwrap();
    let summary: Vec<_> = balances
        .iter()
        .map(|b| (JsonValue::Object(b.sum_by.clone()), b.amount))
        .collect();
    assert_eq!(
        summary,
        vec![
            (json!({"asset_alias": "gold", "account_tags.type": "a"}), 6),
            (json!({"asset_alias": "gold", "account_tags.type": "b"}), 2),
            (json!({"asset_alias": "silver", "account_tags.type": null}), 9),
        ]
    );
}

#[test]
fn spec_config_limits_predicate_size() {
    let config = Config {
        max_predicate_bytes: 10,
        ..Config::default()
    };
    assert!(config.parse("a = 1").is_ok());
    assert!(matches!(
        config.parse("asset_alias = 'gold'"),
        Err(Error::Lex { pos: 10, .. })
    ));
}

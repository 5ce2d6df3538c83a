// tests/evaluator_tests.rs

use ledger_query::{
    eval, evaluate, evaluate_with, matches, parse, Environment, Error, MapEnv, Set, Value,
};
use serde_json::{json, Value as JsonValue};

fn eval_set(text: &str, doc: &JsonValue) -> Set {
    let env = MapEnv::from_value(doc).unwrap();
    evaluate(&env, &parse(text).unwrap()).unwrap()
}

fn holds(text: &str, doc: &JsonValue) -> bool {
    eval_set(text, doc).is_universal()
}

fn tx() -> JsonValue {
    json!({
        "id": "tx1",
        "is_local": true,
        "reference_data": {"invoice": {"id": "inv-7", "lines": 3}},
        "inputs": [
            {"asset_alias": "gold", "amount": 10, "account_alias": "alice"},
            {"asset_alias": "silver", "amount": 5, "account_alias": "alice"}
        ],
        "outputs": [
            {"asset_alias": "gold", "amount": 15, "account_alias": "bob"}
        ]
    })
}

// ============================================================================
// Scalars and Comparisons
// ============================================================================

#[test]
fn test_equality() {
    let doc = tx();
    assert!(holds("id = 'tx1'", &doc));
    assert!(!holds("id = 'tx2'", &doc));
    assert!(holds("id != 'tx2'", &doc));
}

#[test]
fn test_ordering() {
    let doc = json!({"amount": 10, "alias": "m"});
    assert!(holds("amount > 9", &doc));
    assert!(holds("amount >= 10", &doc));
    assert!(!holds("amount < 10", &doc));
    assert!(holds("amount <= 10", &doc));
    assert!(holds("alias < 'n'", &doc));
    assert!(!holds("alias > 'n'", &doc));
}

#[test]
fn test_bare_boolean_attribute() {
    let doc = tx();
    assert!(holds("is_local", &doc));
    assert!(holds("is_local = is_local", &doc));
    assert!(!holds("missing_flag", &doc));
}

#[test]
fn test_selectors() {
    let doc = tx();
    assert!(holds("reference_data.invoice.id = 'inv-7'", &doc));
    assert!(holds("reference_data.invoice.lines > 2", &doc));
    assert!(!holds("reference_data.invoice.nope = 1", &doc));
    assert!(!holds("id.x = 1", &doc));
}

// ============================================================================
// Permissive Semantics
// ============================================================================

#[test]
fn test_missing_fields_are_false() {
    let empty = json!({});
    assert_eq!(eval_set("foo = 'bar'", &empty), Set::none());
    assert_eq!(eval_set("foo != 'bar'", &empty), Set::none());
    assert_eq!(eval_set("foo > 1", &empty), Set::none());
    assert_eq!(eval_set("foo.bar = 1", &empty), Set::none());
    assert_eq!(eval_set("inputs(a = 1)", &empty), Set::none());
}

#[test]
fn test_type_mismatch_is_false() {
    let doc = json!({"a": 1, "s": "x"});
    assert!(!holds("a = s", &doc));
    assert!(!holds("a < s", &doc));
}

#[test]
fn test_null_and_fractions_are_missing() {
    let doc = json!({"n": null, "f": 1.5});
    assert!(!holds("n = 1", &doc));
    assert!(!holds("f > 1", &doc));
}

// ============================================================================
// Existentials
// ============================================================================

#[test]
fn test_existential_semantics() {
    let doc = json!({"inputs": [{"a": 1}, {"a": 2}]});
    assert!(holds("inputs(a = 1)", &doc));
    assert!(!holds("inputs(a = 3)", &doc));
    assert_eq!(eval_set("inputs(a = $1)", &doc), Set::of(["1", "2"]));
}

#[test]
fn test_existential_is_per_element() {
    let doc = tx();
    assert!(holds("inputs(asset_alias = 'gold' AND amount = 10)", &doc));
    assert!(!holds("inputs(asset_alias = 'gold' AND amount = 5)", &doc));
    assert!(holds(
        "inputs(account_alias = 'alice') AND outputs(account_alias = 'bob')",
        &doc
    ));
}

#[test]
fn test_misshaped_lists_are_false() {
    let doc = json!({"inputs": [{"a": 1}, 2], "outputs": {"a": 1}});
    assert!(!holds("inputs(a = 1)", &doc));
    assert!(!holds("outputs(a = 1)", &doc));
}

#[test]
fn test_empty_list_is_false() {
    assert!(!holds("inputs(a = 1)", &json!({"inputs": []})));
}

// ============================================================================
// Placeholders and Set Algebra
// ============================================================================

#[test]
fn test_and_is_intersection() {
    let doc = json!({"inputs": [{"a": 1}, {"a": 2}], "outputs": [{"a": 2}, {"a": 3}]});
    let a = eval_set("inputs(a = $1)", &doc);
    let b = eval_set("outputs(a = $1)", &doc);
    assert_eq!(eval_set("inputs(a = $1) AND outputs(a = $1)", &doc), a.intersect(&b));
    assert_eq!(eval_set("inputs(a = $1) OR outputs(a = $1)", &doc), a.union(&b));
    assert_eq!(eval_set("inputs(a = $1) AND outputs(a = $1)", &doc), Set::of(["2"]));
}

#[test]
fn test_not_equal_is_complement() {
    let doc = json!({"a": "x"});
    let eq = eval_set("a = $1", &doc);
    let ne = eval_set("a != $1", &doc);
    assert_eq!(ne, eq.complement());
    assert!(ne.contains("y"));
    assert!(!ne.contains("x"));
}

#[test]
fn test_complement_in_conjunction() {
    let doc = json!({"a": "x", "b": "y"});
    assert_eq!(eval_set("a != $1 AND b = $1", &doc), Set::of(["y"]));
    assert_eq!(eval_set("a != $1 OR b != $1", &doc), Set::all());
}

#[test]
fn test_placeholder_on_left() {
    let doc = json!({"amount": 10});
    assert_eq!(eval_set("$1 = amount", &doc), Set::of(["10"]));
}

#[test]
fn test_placeholder_compared_to_boolean() {
    let doc = json!({"is_local": true});
    assert_eq!(eval_set("is_local = $1", &doc), Set::of(["true"]));
    assert_eq!(eval_set("$1", &doc), Set::of(["true"]));
}

#[test]
fn test_unbound_ordering_is_false() {
    assert_eq!(eval_set("amount > $1", &json!({"amount": 3})), Set::none());
}

#[test]
fn test_two_unbound_placeholders_is_an_error() {
    let doc = json!({});
    let env = MapEnv::from_value(&doc).unwrap();
    let err = evaluate(&env, &parse("$1 = $2").unwrap()).unwrap_err();
    assert!(matches!(err, Error::Eval { .. }));
}

#[test]
fn test_empty_predicate_is_true() {
    assert_eq!(eval_set("", &json!({})), Set::all());
}

// ============================================================================
// Bound Values
// ============================================================================

#[test]
fn test_evaluate_with_bound_values() {
    let doc = tx();
    let env = MapEnv::from_value(&doc).unwrap();
    let p = parse("inputs(asset_alias = $1 AND amount > $2)").unwrap();

    let set = evaluate_with(&env, &p, &[json!("gold"), json!(5)]).unwrap();
    assert!(set.is_universal());
    assert!(!matches(&env, &p, &[json!("gold"), json!(10)]).unwrap());

    // $2 left unbound: the ordering against it is false
    assert!(!matches(&env, &p, &[json!("gold")]).unwrap());
}

#[test]
fn test_partially_bound_equality() {
    let doc = json!({"a": "x", "b": "y"});
    let env = MapEnv::from_value(&doc).unwrap();
    let p = parse("a = $1 AND b = $2").unwrap();
    let set = evaluate_with(&env, &p, &[json!("x")]).unwrap();
    assert_eq!(set, Set::of(["y"]));
}

#[test]
fn test_eval_returns_values() {
    let doc = tx();
    let env = MapEnv::from_value(&doc).unwrap();
    let expr = parse("reference_data.invoice.lines = 3").unwrap().expr.unwrap();
    assert_eq!(eval(&env, &expr).unwrap(), Value::Bool(Set::all()));
    assert_eq!(env.get("id"), Some(Value::String("tx1".into())));
}

// ============================================================================
// Custom Environments
// ============================================================================

struct Counter {
    n: i64,
}

impl Environment for Counter {
    fn get(&self, name: &str) -> Option<Value> {
        (name == "n").then(|| Value::Integer(self.n))
    }

    fn sub_environments(&self, name: &str) -> Option<Vec<Box<dyn Environment + '_>>> {
        if name != "below" {
            return None;
        }
        Some(
            (0..self.n)
                .map(|n| Box::new(Counter { n }) as Box<dyn Environment + '_>)
                .collect(),
        )
    }
}

#[test]
fn test_custom_environment() {
    let env = Counter { n: 3 };
    let p = parse("below(n = $1)").unwrap();
    assert_eq!(evaluate(&env, &p).unwrap(), Set::of(["0", "1", "2"]));
    assert!(!matches(&env, &parse("below(n = 3)").unwrap(), &[]).unwrap());
}

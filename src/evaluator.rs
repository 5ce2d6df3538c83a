use std::cmp::Ordering;

use serde_json::Value as JsonValue;
use tracing::trace;

use crate::{
    ast::{BinOp, Expr, Literal, Predicate},
    env::Environment,
    error::{Error, Result},
    set::Set,
    value::Value,
};

/// Evaluates predicates directly against in-memory environments.
///
/// Placeholders `$1..=$n` take the bound values; any placeholder past the
/// end of the bound values stays unbound and makes the result a [`Set`] of
/// the values that would satisfy it.
///
/// Evaluation is permissive. Missing attributes, mis-shaped lists and type
/// mismatches make the affected comparison false instead of failing, since
/// ledger JSON is sparse and evolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator<'v> {
    values: &'v [JsonValue],
}

impl<'v> Evaluator<'v> {
    /// An evaluator with every placeholder unbound.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: &'v [JsonValue]) -> Self {
        Evaluator { values }
    }

    /// Evaluates a predicate to the set of placeholder values satisfying it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_query::{parse, Evaluator, MapEnv, Set};
    /// use serde_json::json;
    ///
    /// let doc = json!({"inputs": [{"a": 1}, {"a": 2}]});
    /// let env = MapEnv::from_value(&doc).unwrap();
    /// let predicate = parse("inputs(a = $1)").unwrap();
    ///
    /// let set = Evaluator::new().evaluate(&env, &predicate).unwrap();
    /// assert_eq!(set, Set::of(["1", "2"]));
    /// ```
    pub fn evaluate(&self, env: &dyn Environment, predicate: &Predicate) -> Result<Set> {
        let set = match &predicate.expr {
            None => Set::all(),
            Some(expr) => self.eval_expr(env, expr)?.into_set(),
        };
        trace!(predicate = %predicate, result = ?set, "evaluated predicate");
        Ok(set)
    }

    /// Evaluates a single expression. Booleans come back as [`Value::Bool`].
    pub fn eval_expr(&self, env: &dyn Environment, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(Literal::String(s)) => Ok(Value::String(s.clone())),
            Expr::Literal(Literal::Integer(n)) => Ok(Value::Integer(*n)),
            Expr::Placeholder(n) => Ok(n
                .checked_sub(1)
                .and_then(|i| self.values.get(i))
                .map(Value::from_json)
                .unwrap_or(Value::Any)),
            Expr::Attr(name) => Ok(env.get(name).unwrap_or(Value::Missing)),
            Expr::Paren(inner) => self.eval_expr(env, inner),
            Expr::Selector { object, field } => match self.eval_expr(env, object)? {
                Value::Object(map) => Ok(map
                    .get(field)
                    .map(Value::from_json)
                    .unwrap_or(Value::Missing)),
                _ => Ok(Value::Missing),
            },
            Expr::Exists { name, body } => {
                // Existential OR over the list; absent or mis-shaped lists are false.
                let Some(subs) = env.sub_environments(name) else {
                    return Ok(Value::Bool(Set::none()));
                };
                let mut result = Set::none();
                for sub in &subs {
                    let set = self.eval_expr(sub.as_ref(), body)?.into_set();
                    result = result.union(&set);
                }
                Ok(Value::Bool(result))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(env, left)?;
                let right = self.eval_expr(env, right)?;
                apply_binop(*op, left, right).map(Value::Bool)
            }
        }
    }
}

fn apply_binop(op: BinOp, left: Value, right: Value) -> Result<Set> {
    match op {
        BinOp::And => Ok(left.into_set().intersect(&right.into_set())),
        BinOp::Or => Ok(left.into_set().union(&right.into_set())),
        BinOp::Equal => equal(&left, &right),
        BinOp::NotEqual => {
            if left == Value::Missing || right == Value::Missing {
                return Ok(Set::none());
            }
            equal(&left, &right).map(|set| set.complement())
        }
        BinOp::LessThan => Ok(compare(&left, &right, Ordering::is_lt)),
        BinOp::LessEqual => Ok(compare(&left, &right, Ordering::is_le)),
        BinOp::GreaterThan => Ok(compare(&left, &right, Ordering::is_gt)),
        BinOp::GreaterEqual => Ok(compare(&left, &right, Ordering::is_ge)),
    }
}

fn equal(left: &Value, right: &Value) -> Result<Set> {
    match (left, right) {
        (Value::Missing, _) | (_, Value::Missing) => Ok(Set::none()),
        (Value::Any, Value::Any) => Err(Error::Eval {
            message: "cannot compare two unbound placeholders".to_string(),
        }),
        (Value::Any, other) | (other, Value::Any) => match other.as_key() {
            Some(key) => Ok(Set::of([key])),
            None if matches!(other, Value::Bool(_)) => Err(Error::Eval {
                message: "cannot compare an unbound placeholder with a placeholder-dependent boolean"
                    .to_string(),
            }),
            None => Ok(Set::none()),
        },
        // a = b  ≡  (a ∧ b) ∨ (¬a ∧ ¬b)
        (Value::Bool(a), Value::Bool(b)) => {
            Ok(a.intersect(b).union(&a.complement().intersect(&b.complement())))
        }
        (Value::String(a), Value::String(b)) => Ok(Set::from_bool(a == b)),
        (Value::Integer(a), Value::Integer(b)) => Ok(Set::from_bool(a == b)),
        (Value::Object(a), Value::Object(b)) => Ok(Set::from_bool(a == b)),
        _ => Ok(Set::none()),
    }
}

/// Ordering comparisons need two concrete scalars of the same type.
fn compare(left: &Value, right: &Value, accept: fn(Ordering) -> bool) -> Set {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => return Set::none(),
    };
    Set::from_bool(accept(ordering))
}

/// Evaluate `expr` against `env` with every placeholder unbound.
pub fn eval(env: &dyn Environment, expr: &Expr) -> Result<Value> {
    Evaluator::new().eval_expr(env, expr)
}

/// The set of placeholder values for which `predicate` holds in `env`.
pub fn evaluate(env: &dyn Environment, predicate: &Predicate) -> Result<Set> {
    Evaluator::new().evaluate(env, predicate)
}

/// Like [`evaluate`], with `$k` bound to `values[k - 1]`.
pub fn evaluate_with(
    env: &dyn Environment,
    predicate: &Predicate,
    values: &[JsonValue],
) -> Result<Set> {
    Evaluator::with_values(values).evaluate(env, predicate)
}

/// True when some assignment of the remaining unbound placeholders
/// satisfies `predicate`; with every placeholder bound, plain truth.
pub fn matches(env: &dyn Environment, predicate: &Predicate, values: &[JsonValue]) -> Result<bool> {
    evaluate_with(env, predicate, values).map(|set| !set.is_empty())
}

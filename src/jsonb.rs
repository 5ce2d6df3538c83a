//! Reduces predicates to JSONB containment shapes.
//!
//! A shape is a partial document. A ledger object satisfies a predicate iff
//! it contains (in the `@>` sense) at least one of the predicate's shapes,
//! so many registered filters can be matched against one new object by
//! testing each distinct shape once.
//!
//! Only equality, `AND`, `OR` and existentials reduce soundly; everything
//! else is [`Error::Unsupported`].

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Literal, Predicate},
    error::{Error, Result},
    path::extract_path,
};

/// Shapes for a whole predicate. The empty predicate has the single empty
/// shape, which every object contains.
pub fn predicate_shapes(predicate: &Predicate, values: &[JsonValue]) -> Result<Vec<JsonValue>> {
    let shapes = match &predicate.expr {
        None => vec![JsonValue::Object(Map::new())],
        Some(expr) => matching_shapes(expr, values)?,
    };
    debug!(predicate = %predicate, shapes = shapes.len(), "reduced predicate to shapes");
    Ok(shapes)
}

/// Shapes for `expr` with `$k` bound to `values[k - 1]`.
///
/// # Examples
///
/// ```
/// use ledger_query::{matching_shapes, parse};
/// use serde_json::json;
///
/// let p = parse("a = 'abc' OR b = 'xyz'").unwrap();
/// let shapes = matching_shapes(p.expr.as_ref().unwrap(), &[]).unwrap();
/// assert_eq!(shapes, vec![json!({"a": "abc"}), json!({"b": "xyz"})]);
/// ```
pub fn matching_shapes(expr: &Expr, values: &[JsonValue]) -> Result<Vec<JsonValue>> {
    match expr {
        Expr::Paren(inner) => matching_shapes(inner, values),
        Expr::Binary {
            op: BinOp::Or,
            left,
            right,
        } => {
            let mut shapes = matching_shapes(left, values)?;
            shapes.extend(matching_shapes(right, values)?);
            Ok(shapes)
        }
        Expr::Binary {
            op: BinOp::And,
            left,
            right,
        } => {
            let left = matching_shapes(left, values)?;
            let right = matching_shapes(right, values)?;
            // Conflicting pairs can never both hold, so they drop out.
            Ok(left
                .iter()
                .flat_map(|l| right.iter().filter_map(move |r| merge(l, r)))
                .collect())
        }
        Expr::Binary {
            op: BinOp::Equal,
            left,
            right,
        } => {
            let (path, value) = if extract_path(left).is_some() {
                (left, right)
            } else {
                (right, left)
            };
            equality_shape(path, value, values).map(|shape| vec![shape])
        }
        Expr::Exists { name, body } => Ok(matching_shapes(body, values)?
            .into_iter()
            .map(|shape| {
                let mut map = Map::new();
                map.insert(name.clone(), JsonValue::Array(vec![shape]));
                JsonValue::Object(map)
            })
            .collect()),
        other => Err(Error::unsupported(format!(
            "only =, AND, OR and existentials reduce to shapes, got `{other}`"
        ))),
    }
}

/// `{a: {b: v}}` for `a.b = v`.
fn equality_shape(path: &Expr, value: &Expr, values: &[JsonValue]) -> Result<JsonValue> {
    let path = extract_path(path)
        .ok_or_else(|| Error::unsupported(format!("`{path}` is not an attribute path")))?;
    let mut shape = constant(value, values)?;
    for key in path.fields.iter().rev().chain(std::iter::once(&path.root)) {
        let mut map = Map::new();
        map.insert(key.to_string(), shape);
        shape = JsonValue::Object(map);
    }
    Ok(shape)
}

fn constant(expr: &Expr, values: &[JsonValue]) -> Result<JsonValue> {
    match expr.unparen() {
        Expr::Literal(Literal::String(s)) => Ok(JsonValue::String(s.clone())),
        Expr::Literal(Literal::Integer(n)) => Ok(JsonValue::from(*n)),
        Expr::Placeholder(index) => index
            .checked_sub(1)
            .and_then(|i| values.get(i))
            .cloned()
            .ok_or_else(|| Error::unsupported(format!("unbound placeholder ${index}"))),
        other => Err(Error::unsupported(format!("`{other}` is not a constant"))),
    }
}

/// Deep-merge two shapes; `None` when they require conflicting scalars.
pub(crate) fn merge(a: &JsonValue, b: &JsonValue) -> Option<JsonValue> {
    match (a, b) {
        (JsonValue::Object(a), JsonValue::Object(b)) => {
            let mut merged = a.clone();
            for (key, value) in b {
                let entry = match merged.get(key) {
                    Some(existing) => merge(existing, value)?,
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Some(JsonValue::Object(merged))
        }
        (JsonValue::Array(a), JsonValue::Array(b)) => {
            Some(JsonValue::Array(a.iter().chain(b).cloned().collect()))
        }
        (a, b) if a == b => Some(a.clone()),
        _ => None,
    }
}

/// JSONB containment, `doc @> shape`.
///
/// # Examples
///
/// ```
/// use ledger_query::contains;
/// use serde_json::json;
///
/// let doc = json!({"inputs": [{"a": 1, "b": 2}, {"a": 3}]});
/// assert!(contains(&doc, &json!({"inputs": [{"a": 3}]})));
/// assert!(!contains(&doc, &json!({"inputs": [{"a": 3, "b": 2}]})));
/// ```
pub fn contains(doc: &JsonValue, shape: &JsonValue) -> bool {
    match (doc, shape) {
        (JsonValue::Object(doc), JsonValue::Object(shape)) => shape
            .iter()
            .all(|(key, sub)| doc.get(key).is_some_and(|value| contains(value, sub))),
        (JsonValue::Array(doc), JsonValue::Array(shape)) => shape
            .iter()
            .all(|sub| doc.iter().any(|value| contains(value, sub))),
        (doc, shape) => doc == shape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_conflicting_scalars() {
        assert_eq!(merge(&json!({"a": 1}), &json!({"a": 2})), None);
        assert_eq!(
            merge(&json!({"a": {"b": 1}}), &json!({"a": {"c": 2}})),
            Some(json!({"a": {"b": 1, "c": 2}}))
        );
    }

    #[test]
    fn test_merge_concatenates_lists() {
        assert_eq!(
            merge(&json!({"l": [{"x": 1}]}), &json!({"l": [{"y": 2}]})),
            Some(json!({"l": [{"x": 1}, {"y": 2}]}))
        );
    }

    #[test]
    fn test_contains_scalars_and_arrays() {
        assert!(contains(&json!(1), &json!(1)));
        assert!(!contains(&json!(1), &json!("1")));
        assert!(contains(&json!([1, 2, 3]), &json!([3, 1])));
        assert!(contains(&json!({"a": 1}), &json!({})));
        assert!(!contains(&json!({}), &json!({"a": null})));
    }
}

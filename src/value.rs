use serde_json::{Map, Value as JsonValue};

use crate::{set::Set, typecheck::Type};

/// A value produced while evaluating a predicate directly.
///
/// Booleans are carried as a [`Set`] of the placeholder values that make
/// them true, so a comparison against an unbound placeholder stays exact.
///
/// # Examples
///
/// ```
/// use ledger_query::Value;
/// use serde_json::json;
///
/// assert_eq!(Value::from_json(&json!("gold")), Value::String("gold".into()));
/// assert_eq!(Value::from_json(&json!(7)), Value::Integer(7));
/// assert_eq!(Value::from_json(&json!(null)), Value::Missing);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An unbound placeholder.
    Any,

    Bool(Set),

    String(String),

    Integer(i64),

    Object(Map<String, JsonValue>),

    /// Absent, null, or a JSON shape predicates cannot compare
    /// (lists, fractional numbers).
    Missing,
}

impl Value {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Bool(b) => Value::Bool(Set::from_bool(*b)),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Number(n) => n.as_i64().map(Value::Integer).unwrap_or(Value::Missing),
            JsonValue::Object(map) => Value::Object(map.clone()),
            JsonValue::Null | JsonValue::Array(_) => Value::Missing,
        }
    }

    pub fn type_of(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            Value::Integer(_) => Type::Integer,
            Value::Object(_) => Type::Object,
            Value::Any | Value::Missing => Type::Any,
        }
    }

    /// Text a placeholder would have to equal for `placeholder = self` to hold.
    ///
    /// `None` for objects, missing values and placeholder-dependent booleans.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Bool(set) => set.as_bool().map(|b| b.to_string()),
            _ => None,
        }
    }

    /// Boolean view used by `AND`, `OR` and existentials.
    ///
    /// A bare placeholder holds when it is bound to `true`; non-boolean
    /// values are false.
    pub fn into_set(self) -> Set {
        match self {
            Value::Bool(set) => set,
            Value::Any => Set::of(["true"]),
            _ => Set::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_types() {
        assert_eq!(Value::from_json(&json!(true)).type_of(), Type::Bool);
        assert_eq!(Value::from_json(&json!({"a": 1})).type_of(), Type::Object);
        assert_eq!(Value::from_json(&json!(1.5)), Value::Missing);
        assert_eq!(Value::from_json(&json!([1])), Value::Missing);
        assert_eq!(Value::Any.type_of(), Type::Any);
    }

    #[test]
    fn test_keys() {
        assert_eq!(Value::Integer(-3).as_key(), Some("-3".to_string()));
        assert_eq!(Value::Bool(Set::none()).as_key(), Some("false".to_string()));
        assert_eq!(Value::Bool(Set::of(["x"])).as_key(), None);
        assert_eq!(Value::Missing.as_key(), None);
    }
}

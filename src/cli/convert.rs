//! JSON conversions for command-line input and output

use serde_json::{Value as JsonValue, json};

use super::CliError;
use crate::Set;

/// Parse `--values`: a JSON array of bound placeholder values.
/// Absent means no bound values.
pub fn parse_values(values: Option<&str>) -> Result<Vec<JsonValue>, CliError> {
    match values {
        None => Ok(Vec::new()),
        Some(text) => match serde_json::from_str(text)? {
            JsonValue::Array(values) => Ok(values),
            _ => Err(CliError::ValuesNotArray),
        },
    }
}

/// Parse the document a predicate is checked against.
pub fn parse_input(input: &str) -> Result<JsonValue, CliError> {
    let doc: JsonValue = serde_json::from_str(input)?;
    if doc.is_object() {
        Ok(doc)
    } else {
        Err(CliError::InputNotObject)
    }
}

/// Placeholder-independent sets print as plain booleans.
pub fn set_to_json(set: &Set) -> JsonValue {
    match set.as_bool() {
        Some(b) => JsonValue::Bool(b),
        None if set.invert => json!({ "not": set.values }),
        None => json!({ "in": set.values }),
    }
}

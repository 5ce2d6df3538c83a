//! Compile predicates to SQL fragments or containment shapes

use serde_json::Value as JsonValue;

use super::{CliError, parse_values};
use crate::{Config, compile_with_offset, parse_for_table, predicate_shapes, schema};

/// Options for the sql command
#[derive(Debug, Clone, Default)]
pub struct SqlOptions {
    pub predicate: String,
    /// Logical table name; the configured default when absent
    pub table: Option<String>,
    /// JSON array of bound placeholder values
    pub values: Option<String>,
    /// Overrides the configured parameter offset
    pub offset: Option<usize>,
    pub config: Config,
}

/// Compile to `{"sql": ..., "values": [...]}`.
pub fn execute_sql(options: &SqlOptions) -> Result<JsonValue, CliError> {
    let name = options
        .table
        .as_deref()
        .unwrap_or(&options.config.default_table);
    let table = schema::ledger_table(name).ok_or_else(|| CliError::UnknownTable(name.to_string()))?;

    // Length limit first, then the table-aware check.
    options.config.parse(&options.predicate)?;
    let predicate = parse_for_table(&options.predicate, &table)?;

    let values = parse_values(options.values.as_deref())?;
    let offset = options.offset.unwrap_or(options.config.param_offset);
    let expr = compile_with_offset(&predicate, &table, &values, offset)?;
    Ok(serde_json::to_value(expr)?)
}

/// Reduce to the list of containment shapes.
pub fn execute_shapes(
    predicate: &str,
    values: Option<&str>,
    config: &Config,
) -> Result<JsonValue, CliError> {
    let predicate = config.parse(predicate)?;
    let values = parse_values(values)?;
    Ok(JsonValue::Array(predicate_shapes(&predicate, &values)?))
}

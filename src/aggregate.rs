//! Balance aggregation: `SUM(amount)` grouped by attribute paths.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::{
    error::{Error, Result},
    lexer::Lexer,
    parser::Parser,
    path::extract_path,
    schema::{SqlTable, SqlType},
    sql::{column_expr, json_path},
};

/// A `sum_by` field resolved to its attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    /// Dotted text, used as the output name.
    name: String,
    root: String,
    fields: Vec<String>,
}

fn parse_field(text: &str) -> Result<Field> {
    let expr = Parser::new(Lexer::new(text))?
        .parse()?
        .ok_or_else(|| aggregate_error("empty sum_by field"))?;
    let path = extract_path(&expr)
        .ok_or_else(|| aggregate_error(format!("sum_by field must be an attribute path: {text}")))?;
    Ok(Field {
        name: path.key(),
        root: path.root.to_string(),
        fields: path.fields.iter().map(|f| f.to_string()).collect(),
    })
}

fn aggregate_error(message: impl Into<String>) -> Error {
    Error::Aggregate {
        message: message.into(),
    }
}

/// SQL fragments for a balance query over `table`.
///
/// # Examples
///
/// ```
/// use ledger_query::{schema, SumBy};
///
/// let sum = SumBy::compile(&schema::outputs(), &["asset_alias"]).unwrap();
/// assert_eq!(sum.select_list(), r#"out."asset_alias" AS "asset_alias", SUM(out."amount") AS "amount""#);
/// assert_eq!(sum.group_by(), r#"out."asset_alias""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumBy {
    names: Vec<String>,
    exprs: Vec<String>,
    amount: String,
}

impl SumBy {
    pub fn compile<S: AsRef<str>>(table: &SqlTable, fields: &[S]) -> Result<Self> {
        let amount = table
            .column("amount")
            .ok_or_else(|| aggregate_error(format!("{} has no amount column", table.name)))?;

        let mut names = Vec::with_capacity(fields.len());
        let mut exprs = Vec::with_capacity(fields.len());
        for text in fields {
            let field = parse_field(text.as_ref())?;
            let column = table
                .column(&field.root)
                .ok_or_else(|| aggregate_error(format!("invalid attribute: {}", field.root)))?;
            let expr = if field.fields.is_empty() {
                column_expr(table, column)
            } else if column.sql_type == SqlType::Jsonb {
                json_path(&table.qualify(&column.name), &field.fields)
            } else {
                return Err(aggregate_error(format!(
                    "cannot index into non-jsonb column {}",
                    field.root
                )));
            };
            names.push(field.name);
            exprs.push(expr);
        }

        Ok(SumBy {
            names,
            exprs,
            amount: format!("SUM({}) AS \"amount\"", table.qualify(&amount.name)),
        })
    }

    /// Output names of the grouping fields, in order.
    pub fn fields(&self) -> &[String] {
        &self.names
    }

    pub fn select_list(&self) -> String {
        self.exprs
            .iter()
            .zip(&self.names)
            .map(|(expr, name)| format!("{expr} AS \"{}\"", name.replace('"', "\"\"")))
            .chain(std::iter::once(self.amount.clone()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn group_by(&self) -> String {
        self.exprs.join(", ")
    }
}

/// One group of a balance query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    /// Grouping field name to the group's value (`null` when absent).
    pub sum_by: Map<String, JsonValue>,
    pub amount: i64,
}

/// Sum the integer `amount` of `objects` grouped by the values at `fields`.
///
/// Groups come back in the order they are first seen. Objects without an
/// integer `amount` are skipped.
pub fn sum_by<S: AsRef<str>>(objects: &[JsonValue], fields: &[S]) -> Result<Vec<Balance>> {
    let fields = fields
        .iter()
        .map(|f| parse_field(f.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut balances: Vec<Balance> = Vec::new();
    let mut groups: BTreeMap<String, usize> = BTreeMap::new();

    for object in objects {
        let Some(amount) = object.get("amount").and_then(JsonValue::as_i64) else {
            continue;
        };
        let key: Vec<JsonValue> = fields.iter().map(|f| lookup(object, f)).collect();
        let group = JsonValue::Array(key.clone()).to_string();

        match groups.get(&group) {
            Some(&i) => {
                let balance = &mut balances[i];
                balance.amount = balance
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| aggregate_error("amount overflows a 64-bit integer"))?;
            }
            None => {
                groups.insert(group, balances.len());
                balances.push(Balance {
                    sum_by: fields.iter().map(|f| f.name.clone()).zip(key).collect(),
                    amount,
                });
            }
        }
    }
    Ok(balances)
}

fn lookup(object: &JsonValue, field: &Field) -> JsonValue {
    std::iter::once(&field.root)
        .chain(&field.fields)
        .try_fold(object, |value, key| value.get(key))
        .cloned()
        .unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use serde_json::json;

    #[test]
    fn test_selector_fields_read_json() {
        let sum = SumBy::compile(&schema::outputs(), &["asset_alias", "account_tags.type"]).unwrap();
        assert_eq!(sum.fields(), ["asset_alias", "account_tags.type"]);
        assert_eq!(
            sum.group_by(),
            "out.\"asset_alias\", (out.\"account_tags\"->>'type')"
        );
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let outputs = schema::outputs();
        assert!(matches!(
            SumBy::compile(&outputs, &["nope"]),
            Err(Error::Aggregate { .. })
        ));
        assert!(matches!(
            SumBy::compile(&outputs, &["asset_alias.x"]),
            Err(Error::Aggregate { .. })
        ));
        assert!(matches!(
            SumBy::compile(&outputs, &["a = 1"]),
            Err(Error::Aggregate { .. })
        ));
        assert!(matches!(
            SumBy::compile(&schema::accounts(), &["alias"]),
            Err(Error::Aggregate { .. })
        ));
    }

    #[test]
    fn test_sum_by_groups_in_first_seen_order() {
        let objects = vec![
            json!({"asset_alias": "gold", "amount": 5}),
            json!({"asset_alias": "silver", "amount": 1}),
            json!({"asset_alias": "gold", "amount": 7}),
            json!({"asset_alias": "gold"}),
        ];
        let balances = sum_by(&objects, &["asset_alias"]).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].sum_by["asset_alias"], json!("gold"));
        assert_eq!(balances[0].amount, 12);
        assert_eq!(balances[1].amount, 1);
    }

    #[test]
    fn test_sum_by_missing_path_groups_as_null() {
        let objects = vec![
            json!({"account_tags": {"type": "a"}, "amount": 2}),
            json!({"amount": 3}),
        ];
        let balances = sum_by(&objects, &["account_tags.type"]).unwrap();
        assert_eq!(balances[1].sum_by["account_tags.type"], JsonValue::Null);
    }
}

//! Compiles predicates into parameterized SQL boolean fragments.
//!
//! The output is meant to be spliced into a larger `WHERE` clause. Unlike the
//! direct evaluator the compiler fails closed: unknown attributes, selectors
//! on non-JSONB columns and unbound placeholders are all errors.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    ast::{Expr, Literal, Predicate},
    env::SchemaEnv,
    error::{Error, Result},
    path::{extract_path, scoped_key},
    schema::{SqlColumn, SqlTable, SqlType},
    typecheck::{Type, type_check},
};

/// A compiled SQL fragment and the values bound to its `$n` parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlExpr {
    pub sql: String,
    pub values: Vec<JsonValue>,
}

/// Compile `predicate` against `table`, numbering parameters from `$1`.
///
/// A selector path is cast by the type inferred from its uses. A path only
/// ever compared with placeholders has no inferred type and compares as
/// text, so `reference_data.n > $1` orders lexically even when `$1` is
/// bound to a number. Compare the path with a literal somewhere in the
/// predicate to fix its type.
///
/// # Examples
///
/// ```
/// use ledger_query::{compile, parse, schema};
/// use serde_json::json;
///
/// let predicate = parse("asset_id = $1").unwrap();
/// let expr = compile(&predicate, &schema::outputs(), &[json!("a1b2")]).unwrap();
/// assert_eq!(expr.sql, r#"encode(out."asset_id", 'hex') = $1"#);
/// assert_eq!(expr.values, vec![json!("a1b2")]);
/// ```
pub fn compile(predicate: &Predicate, table: &SqlTable, values: &[JsonValue]) -> Result<SqlExpr> {
    compile_with_offset(predicate, table, values, 0)
}

/// Like [`compile`], for a statement that already has `offset` parameters:
/// the first emitted parameter is `$offset+1`.
pub fn compile_with_offset(
    predicate: &Predicate,
    table: &SqlTable,
    values: &[JsonValue],
    offset: usize,
) -> Result<SqlExpr> {
    let Some(expr) = &predicate.expr else {
        return Ok(SqlExpr {
            sql: "TRUE".to_string(),
            values: Vec::new(),
        });
    };

    // Re-check against this table; the predicate may have been parsed without one.
    let selector_types = type_check(expr, Some(table as &dyn SchemaEnv))?;

    let mut compiler = SqlCompiler {
        selector_types: &selector_types,
        bound: values,
        offset,
        numbers: BTreeMap::new(),
        values: Vec::new(),
        scope: Vec::new(),
    };
    let sql = compiler.compile(expr, table)?;
    debug!(%sql, binds = compiler.values.len(), table = %table.name, "compiled predicate");

    Ok(SqlExpr {
        sql,
        values: compiler.values,
    })
}

struct SqlCompiler<'a> {
    selector_types: &'a BTreeMap<String, Type>,
    bound: &'a [JsonValue],
    offset: usize,
    /// Placeholder index to emitted parameter number.
    numbers: BTreeMap<usize, usize>,
    values: Vec<JsonValue>,
    scope: Vec<String>,
}

impl SqlCompiler<'_> {
    fn compile(&mut self, expr: &Expr, table: &SqlTable) -> Result<String> {
        match expr {
            Expr::Literal(Literal::String(s)) => Ok(quote_literal(s)),
            Expr::Literal(Literal::Integer(n)) => Ok(n.to_string()),
            Expr::Placeholder(index) => self.placeholder(*index),
            Expr::Attr(name) => table
                .column(name)
                .map(|column| column_expr(table, column))
                .ok_or_else(|| Error::compile(format!("invalid attribute: {name}"))),
            Expr::Paren(inner) => Ok(format!("({})", self.compile(inner, table)?)),
            Expr::Selector { .. } => self.selector(expr, table),
            Expr::Exists { name, body } => {
                let fk = table
                    .foreign_key(name)
                    .ok_or_else(|| Error::compile(format!("invalid environment: {name}")))?;
                let inner = fk.table.as_ref();

                self.scope.push(name.clone());
                let body = self.compile(body, inner);
                self.scope.pop();

                Ok(format!(
                    "EXISTS(SELECT 1 FROM {} AS {} WHERE {} = {} AND ({}))",
                    inner.name,
                    inner.alias,
                    inner.qualify(&fk.foreign_column),
                    table.qualify(&fk.local_column),
                    body?
                ))
            }
            Expr::Binary { op, left, right } => {
                let mut l = self.compile(left, table)?;
                let mut r = self.compile(right, table)?;
                if op.is_comparison() {
                    // SQL comparisons do not chain.
                    if matches!(**left, Expr::Binary { .. }) {
                        l = format!("({l})");
                    }
                    if matches!(**right, Expr::Binary { .. }) {
                        r = format!("({r})");
                    }
                }
                Ok(format!("{l} {} {r}", op.sql()))
            }
        }
    }

    fn placeholder(&mut self, index: usize) -> Result<String> {
        if let Some(number) = self.numbers.get(&index) {
            return Ok(format!("${number}"));
        }
        let value = index
            .checked_sub(1)
            .and_then(|i| self.bound.get(i))
            .cloned()
            .ok_or_else(|| Error::compile(format!("unbound placeholder ${index}")))?;
        self.values.push(value);
        let number = self.offset + self.values.len();
        self.numbers.insert(index, number);
        Ok(format!("${number}"))
    }

    fn selector(&mut self, expr: &Expr, table: &SqlTable) -> Result<String> {
        let path = extract_path(expr).ok_or_else(|| {
            Error::compile(format!("selector must be rooted at an attribute: {expr}"))
        })?;
        let column = table
            .column(path.root)
            .ok_or_else(|| Error::compile(format!("invalid attribute: {}", path.root)))?;
        if column.sql_type != SqlType::Jsonb {
            return Err(Error::compile(format!(
                "cannot index into non-jsonb column {}",
                path.root
            )));
        }

        let extract = json_path(&table.qualify(&column.name), &path.fields);
        let cast = match self.selector_types.get(&scoped_key(&self.scope, expr)) {
            Some(Type::Integer) => "::bigint",
            Some(Type::Bool) => "::boolean",
            Some(Type::Object) => "::jsonb",
            _ => "",
        };
        Ok(format!("{extract}{cast}"))
    }
}

/// `(col->'a'->'b'->>'c')`: every hop but the last keeps JSON, the last
/// extracts text.
pub(crate) fn json_path<S: AsRef<str>>(column: &str, fields: &[S]) -> String {
    let mut out = format!("({column}");
    for (i, field) in fields.iter().enumerate() {
        out.push_str(if i + 1 == fields.len() { "->>" } else { "->" });
        out.push_str(&quote_literal(field.as_ref()));
    }
    out.push(')');
    out
}

/// A column read as a comparable scalar.
pub(crate) fn column_expr(table: &SqlTable, column: &SqlColumn) -> String {
    let qualified = table.qualify(&column.name);
    match column.sql_type {
        SqlType::Bytea => format!("encode({qualified}, 'hex')"),
        SqlType::Jsonb => format!("{qualified}::text"),
        SqlType::Bigint | SqlType::Integer => format!("{qualified}::bigint"),
        SqlType::Timestamp => format!(
            "to_char({qualified} AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"')"
        ),
        SqlType::Text | SqlType::Boolean => qualified,
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

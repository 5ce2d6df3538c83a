//! Static typing of predicates.
//!
//! Types are assigned bottom-up. Without a schema every attribute is [`Type::Any`];
//! with a [`SchemaEnv`] (such as a [`SqlTable`](crate::schema::SqlTable))
//! attributes take their declared types and existentials must name declared
//! sub-object lists.
//!
//! JSON fields read through dotted selectors carry no static type, so the
//! checker infers one from how each selector path is used and rejects a path
//! used with two different types: the SQL backend casts a path exactly one way.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    ast::{BinOp, Expr, Literal},
    env::SchemaEnv,
    error::{Error, Result},
    path::{is_selector, scoped_key},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// Statically unknown; unifies with every type.
    Any,
    Bool,
    String,
    Integer,
    Object,
}

impl Type {
    /// `Any` unifies with everything; otherwise types must be equal.
    pub fn unifies(self, other: Type) -> bool {
        self == Type::Any || other == Type::Any || self == other
    }

    pub fn is_known(self) -> bool {
        self != Type::Any
    }

    /// String or integer, the types that can be ordered.
    fn is_ordered(self) -> bool {
        matches!(self, Type::Any | Type::String | Type::Integer)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Any => "any",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Integer => "integer",
            Type::Object => "object",
        })
    }
}

/// Type-check `expr`, optionally against a table schema, returning the type
/// inferred for every selector path.
///
/// The predicate as a whole must be boolean.
pub fn type_check(expr: &Expr, schema: Option<&dyn SchemaEnv>) -> Result<BTreeMap<String, Type>> {
    let mut checker = TypeChecker::default();
    let mut scope = Vec::new();
    let ty = checker.check(expr, schema, &mut scope)?;
    checker.expect_bool(expr, ty, &scope, "predicate")?;
    Ok(checker.selector_types)
}

#[derive(Default)]
struct TypeChecker {
    selector_types: BTreeMap<String, Type>,
}

impl TypeChecker {
    /// Record the type a selector is used as, rejecting conflicting uses.
    fn record(&mut self, expr: &Expr, ty: Type, scope: &[String]) -> Result<()> {
        if !is_selector(expr) || !ty.is_known() {
            return Ok(());
        }
        let key = scoped_key(scope, expr);
        match self.selector_types.get(&key) {
            Some(existing) if *existing != ty => Err(Error::type_error(format!(
                "{key} is used as both {existing} and {ty}"
            ))),
            _ => {
                self.selector_types.insert(key, ty);
                Ok(())
            }
        }
    }

    fn expect_bool(&mut self, expr: &Expr, ty: Type, scope: &[String], what: &str) -> Result<()> {
        if !ty.unifies(Type::Bool) {
            return Err(Error::type_error(format!(
                "{what} must be bool, but `{expr}` is {ty}"
            )));
        }
        self.record(expr, Type::Bool, scope)
    }

    fn check(
        &mut self,
        expr: &Expr,
        schema: Option<&dyn SchemaEnv>,
        scope: &mut Vec<String>,
    ) -> Result<Type> {
        match expr {
            Expr::Literal(Literal::String(_)) => Ok(Type::String),
            Expr::Literal(Literal::Integer(_)) => Ok(Type::Integer),
            Expr::Placeholder(_) => Ok(Type::Any),
            Expr::Paren(inner) => self.check(inner, schema, scope),
            Expr::Attr(name) => match schema {
                None => Ok(Type::Any),
                Some(schema) => schema
                    .attr_type(name)
                    .ok_or_else(|| Error::type_error(format!("invalid attribute: {name}"))),
            },
            Expr::Selector { object, .. } => {
                let ty = self.check(object, schema, scope)?;
                if !ty.unifies(Type::Object) {
                    return Err(Error::type_error(format!(
                        "selector `.` can only be used on objects, but `{object}` is {ty}"
                    )));
                }
                self.record(object, Type::Object, scope)?;
                Ok(Type::Any)
            }
            Expr::Exists { name, body } => {
                let inner = match schema {
                    None => None,
                    Some(schema) => Some(schema.sub_schema(name).ok_or_else(|| {
                        Error::type_error(format!("invalid environment: {name}"))
                    })?),
                };

                scope.push(name.clone());
                let result = match self.check(body, inner, scope) {
                    Ok(ty) => self.expect_bool(body, ty, scope, &format!("{name}(...) body")),
                    Err(err) => Err(err),
                };
                scope.pop();
                result?;
                Ok(Type::Bool)
            }
            Expr::Binary { op, left, right } => {
                let lt = self.check(left, schema, scope)?;
                let rt = self.check(right, schema, scope)?;
                self.check_binary(*op, left, lt, right, rt, scope)?;
                Ok(Type::Bool)
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        lt: Type,
        right: &Expr,
        rt: Type,
        scope: &[String],
    ) -> Result<()> {
        if op.is_logical() {
            self.expect_bool(left, lt, scope, &format!("left operand of {op}"))?;
            return self.expect_bool(right, rt, scope, &format!("right operand of {op}"));
        }

        if op.is_ordering() && !(lt.is_ordered() && rt.is_ordered()) {
            return Err(Error::type_error(format!(
                "{op} requires string or integer operands, got {lt} and {rt}"
            )));
        }
        if lt == Type::Object && rt == Type::Object {
            return Err(Error::type_error("cannot compare two objects"));
        }
        if !lt.unifies(rt) {
            return Err(Error::type_error(format!(
                "{op} operands must have the same type, got {lt} and {rt}"
            )));
        }

        // An untyped selector compared with a typed operand takes that type.
        self.record(left, rt, scope)?;
        self.record(right, lt, scope)
    }
}

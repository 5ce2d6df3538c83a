//! Data a predicate is evaluated against.

use serde_json::{Map, Value as JsonValue};

use crate::{schema::SqlTable, typecheck::Type, value::Value};

/// Attribute lookup for direct evaluation.
///
/// Implementations never fail: an absent attribute is `None`, and ledger
/// data is allowed to be sparse.
pub trait Environment {
    /// Value of a top-level attribute.
    fn get(&self, name: &str) -> Option<Value>;

    /// The elements of a list of sub-objects, for `name(body)`.
    ///
    /// `None` when `name` is absent or is not a list made only of objects.
    fn sub_environments(&self, name: &str) -> Option<Vec<Box<dyn Environment + '_>>>;
}

/// Attribute types for static checking, the schema-backed counterpart of
/// [`Environment`].
///
/// Without one, every attribute is [`Type::Any`] and every existential is
/// accepted.
pub trait SchemaEnv {
    /// Declared type of a top-level attribute, `None` if undeclared.
    fn attr_type(&self, name: &str) -> Option<Type>;

    /// Schema of the sub-objects reached by `name(body)`.
    fn sub_schema(&self, name: &str) -> Option<&dyn SchemaEnv>;
}

impl SchemaEnv for SqlTable {
    fn attr_type(&self, name: &str) -> Option<Type> {
        self.column(name).map(|column| column.ty)
    }

    fn sub_schema(&self, name: &str) -> Option<&dyn SchemaEnv> {
        self.foreign_key(name)
            .map(|fk| fk.table.as_ref() as &dyn SchemaEnv)
    }
}

/// Environment over a decoded JSON object, such as an annotated transaction
/// with nested `inputs` and `outputs` lists.
#[derive(Debug, Clone, Copy)]
pub struct MapEnv<'a> {
    map: &'a Map<String, JsonValue>,
}

impl<'a> MapEnv<'a> {
    pub fn new(map: &'a Map<String, JsonValue>) -> Self {
        MapEnv { map }
    }

    /// `None` unless `value` is a JSON object.
    pub fn from_value(value: &'a JsonValue) -> Option<Self> {
        value.as_object().map(MapEnv::new)
    }
}

impl Environment for MapEnv<'_> {
    fn get(&self, name: &str) -> Option<Value> {
        self.map.get(name).map(Value::from_json)
    }

    fn sub_environments(&self, name: &str) -> Option<Vec<Box<dyn Environment + '_>>> {
        let JsonValue::Array(items) = self.map.get(name)? else {
            return None;
        };
        items
            .iter()
            .map(|item| {
                item.as_object()
                    .map(|map| Box::new(MapEnv::new(map)) as Box<dyn Environment + '_>)
            })
            .collect()
    }
}

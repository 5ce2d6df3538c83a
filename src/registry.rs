//! Reverse matching of one ledger object against many registered filters.
//!
//! Each filter is reduced to containment shapes once, at registration.
//! Filters that share a shape share its entry, so matching a new object
//! costs one containment test per distinct shape.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value as JsonValue;
use tracing::{trace, warn};

use crate::{
    ast::Predicate,
    config::Config,
    error::Result,
    jsonb::{contains, predicate_shapes},
};

pub type FilterId = u64;

#[derive(Debug, Clone)]
struct Filter {
    predicate: Predicate,
    values: Vec<JsonValue>,
    /// Keys into `FilterRegistry::shapes`.
    shapes: BTreeSet<String>,
}

#[derive(Debug, Clone)]
struct Shape {
    doc: JsonValue,
    owners: BTreeSet<FilterId>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    config: Config,
    next_id: FilterId,
    filters: BTreeMap<FilterId, Filter>,
    /// Canonical JSON text of each distinct shape.
    shapes: BTreeMap<String, Shape>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose [`register_str`](Self::register_str) applies
    /// `config`'s predicate size limit.
    pub fn with_config(config: Config) -> Self {
        FilterRegistry {
            config,
            ..Self::default()
        }
    }

    /// Register a filter with its bound placeholder values.
    ///
    /// Fails with [`Error::Unsupported`](crate::Error::Unsupported) when the
    /// predicate does not reduce to shapes.
    pub fn register(&mut self, predicate: Predicate, values: Vec<JsonValue>) -> Result<FilterId> {
        let docs = predicate_shapes(&predicate, &values).inspect_err(|err| {
            warn!(predicate = %predicate, error = %err, "filter cannot be reduced to shapes");
        })?;

        let id = self.next_id;
        self.next_id += 1;

        let mut keys = BTreeSet::new();
        for doc in docs {
            let key = doc.to_string();
            self.shapes
                .entry(key.clone())
                .or_insert_with(|| Shape {
                    doc,
                    owners: BTreeSet::new(),
                })
                .owners
                .insert(id);
            keys.insert(key);
        }

        self.filters.insert(
            id,
            Filter {
                predicate,
                values,
                shapes: keys,
            },
        );
        Ok(id)
    }

    /// Parse `text` under this registry's configuration and register it.
    pub fn register_str(&mut self, text: &str, values: Vec<JsonValue>) -> Result<FilterId> {
        let predicate = self.config.parse(text)?;
        self.register(predicate, values)
    }

    /// Remove a filter, dropping shapes no other filter uses.
    pub fn unregister(&mut self, id: FilterId) -> Option<Predicate> {
        let filter = self.filters.remove(&id)?;
        for key in &filter.shapes {
            if let Some(shape) = self.shapes.get_mut(key) {
                shape.owners.remove(&id);
                if shape.owners.is_empty() {
                    self.shapes.remove(key);
                }
            }
        }
        Some(filter.predicate)
    }

    /// Ids of every filter `doc` satisfies, ascending.
    pub fn matching(&self, doc: &JsonValue) -> Vec<FilterId> {
        let mut ids = BTreeSet::new();
        for (key, shape) in &self.shapes {
            if contains(doc, &shape.doc) {
                trace!(shape = %key, owners = shape.owners.len(), "shape matched");
                ids.extend(&shape.owners);
            }
        }
        ids.into_iter().collect()
    }

    pub fn get(&self, id: FilterId) -> Option<(&Predicate, &[JsonValue])> {
        self.filters
            .get(&id)
            .map(|f| (&f.predicate, f.values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of distinct shapes across all filters.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, parse};
    use serde_json::json;

    #[test]
    fn test_shared_shapes_stored_once() {
        let mut registry = FilterRegistry::new();
        let a = registry.register(parse("asset_alias = 'gold'").unwrap(), vec![]).unwrap();
        let b = registry
            .register(parse("asset_alias = $1").unwrap(), vec![json!("gold")])
            .unwrap();
        assert_eq!(registry.shape_count(), 1);
        assert_eq!(registry.matching(&json!({"asset_alias": "gold", "amount": 3})), vec![a, b]);

        registry.unregister(a);
        assert_eq!(registry.shape_count(), 1);
        registry.unregister(b);
        assert_eq!(registry.shape_count(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unsupported_filter_rejected() {
        let mut registry = FilterRegistry::new();
        let err = registry.register(parse("amount > 5").unwrap(), vec![]).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_str_applies_limit() {
        let mut registry = FilterRegistry::with_config(Config {
            max_predicate_bytes: 4,
            ..Config::default()
        });
        assert!(registry.register_str("asset_alias = 'gold'", vec![]).is_err());
    }
}

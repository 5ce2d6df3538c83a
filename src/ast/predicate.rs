use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ast::Expr, error::Error, typecheck::Type};

/// A parsed, type-checked predicate.
///
/// Immutable after construction and safe to share between threads.
/// Two predicates are equal when their canonical renderings are equal.
#[derive(Debug, Clone)]
pub struct Predicate {
    /// The expression tree; `None` for the empty, match-everything predicate.
    pub expr: Option<Expr>,

    /// Type inferred for each dotted selector path, keyed by path.
    pub selector_types: BTreeMap<String, Type>,

    /// Arity: the largest placeholder index used.
    pub parameters: usize,
}

impl Predicate {
    /// The empty predicate, which matches everything.
    pub fn everything() -> Self {
        Predicate {
            expr: None,
            selector_types: BTreeMap::new(),
            parameters: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
    }

    /// Canonical text form.
    pub fn render(&self) -> String {
        self.expr.as_ref().map(Expr::render).unwrap_or_default()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Some(expr) => write!(f, "{expr}"),
            None => Ok(()),
        }
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for Predicate {}

impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

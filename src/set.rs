//! Boolean results as sets of placeholder values.
//!
//! Evaluating a predicate with an unbound placeholder answers "which values
//! of the placeholder make this true". A [`Set`] is either a finite set of
//! values or, when `invert` is set, the complement of one over the unbounded
//! universe of possible values. `true` is the empty complement and `false`
//! the empty set, so plain booleans need no special case.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Set {
    pub values: BTreeSet<String>,
    pub invert: bool,
}

impl Set {
    /// Every value: `true`.
    pub fn all() -> Self {
        Set {
            values: BTreeSet::new(),
            invert: true,
        }
    }

    /// No value: `false`.
    pub fn none() -> Self {
        Set::default()
    }

    pub fn from_bool(b: bool) -> Self {
        if b { Set::all() } else { Set::none() }
    }

    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Set {
            values: values.into_iter().map(Into::into).collect(),
            invert: false,
        }
    }

    pub fn complement(&self) -> Self {
        Set {
            values: self.values.clone(),
            invert: !self.invert,
        }
    }

    pub fn intersect(&self, other: &Set) -> Self {
        match (self.invert, other.invert) {
            (false, false) => Set::of(self.values.intersection(&other.values).cloned()),
            (false, true) => Set::of(self.values.difference(&other.values).cloned()),
            (true, false) => Set::of(other.values.difference(&self.values).cloned()),
            // ¬A ∩ ¬B = ¬(A ∪ B)
            (true, true) => Set::of(self.values.union(&other.values).cloned()).complement(),
        }
    }

    pub fn union(&self, other: &Set) -> Self {
        match (self.invert, other.invert) {
            (false, false) => Set::of(self.values.union(&other.values).cloned()),
            // A ∪ ¬B = ¬(B \ A)
            (false, true) => Set::of(other.values.difference(&self.values).cloned()).complement(),
            (true, false) => Set::of(self.values.difference(&other.values).cloned()).complement(),
            // ¬A ∪ ¬B = ¬(A ∩ B)
            (true, true) => {
                Set::of(self.values.intersection(&other.values).cloned()).complement()
            }
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value) != self.invert
    }

    /// No placeholder value satisfies it.
    pub fn is_empty(&self) -> bool {
        !self.invert && self.values.is_empty()
    }

    /// Every placeholder value satisfies it.
    pub fn is_universal(&self) -> bool {
        self.invert && self.values.is_empty()
    }

    /// `Some` when the result does not depend on any placeholder.
    pub fn as_bool(&self) -> Option<bool> {
        if self.is_universal() {
            Some(true)
        } else if self.is_empty() {
            Some(false)
        } else {
            None
        }
    }
}

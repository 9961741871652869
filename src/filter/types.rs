//! Filter types

use crate::types::{Item, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One conjunctive clause: every field must equal its expected value.
///
/// An empty spec means "no filtering for this clause".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(JsonObject);

impl FilterSpec {
    /// Create an empty spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field condition
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Whether the spec has no conditions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field conditions in insertion order
    pub fn conditions(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }
}

impl From<JsonObject> for FilterSpec {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

/// Disjunction of [`FilterSpec`] clauses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<FilterSpec>);

impl FilterSet {
    /// A set that applies no filtering
    pub fn none() -> Self {
        Self::default()
    }

    /// Create a set from clauses
    pub fn new(specs: Vec<FilterSpec>) -> Self {
        Self(specs)
    }

    /// A set with a single clause
    pub fn single(spec: FilterSpec) -> Self {
        Self(vec![spec])
    }

    /// Clauses in order
    pub fn specs(&self) -> &[FilterSpec] {
        &self.0
    }

    /// Number of clauses, empty ones included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no clauses at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<FilterSpec>> for FilterSet {
    fn from(specs: Vec<FilterSpec>) -> Self {
        Self(specs)
    }
}

impl FromIterator<FilterSpec> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterSpec>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

type PredicateFn = dyn Fn(&Item) -> bool + Send + Sync;

/// A pure function from item to inclusion
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Accepts every item
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Rejects every item
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// `item[field]`, string-coerced, equals `expected`.
    ///
    /// Missing fields and non-scalar values never match.
    pub fn field_eq(field: impl Into<String>, expected: impl Into<String>) -> Self {
        let field = field.into();
        let expected = expected.into();
        Self::new(move |item| {
            item.get(&field)
                .and_then(super::compiler::scalar_string)
                .is_some_and(|actual| actual == expected)
        })
    }

    /// Logical AND; an empty list accepts everything
    pub fn all(predicates: Vec<Predicate>) -> Self {
        Self::new(move |item| predicates.iter().all(|p| p.matches(item)))
    }

    /// Logical OR; an empty list rejects everything
    pub fn any(predicates: Vec<Predicate>) -> Self {
        Self::new(move |item| predicates.iter().any(|p| p.matches(item)))
    }

    /// Evaluate against an item
    pub fn matches(&self, item: &Item) -> bool {
        (self.0)(item)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

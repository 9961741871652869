//! Filter compilation
//!
//! Compiles a [`FilterSet`] into a single [`Predicate`]. The set is only
//! read, so the same value can be compiled any number of times.

use super::types::{FilterSet, FilterSpec, Predicate};
use crate::types::JsonValue;
use tracing::debug;

/// Result of compiling a filter set
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    /// False when no clause had any condition; every item passes
    pub filter_required: bool,
    /// Combined predicate
    pub predicate: Predicate,
}

impl CompiledFilter {
    /// Whether `item` passes this filter
    pub fn matches(&self, item: &JsonValue) -> bool {
        !self.filter_required || self.predicate.matches(item)
    }
}

/// Builds predicates from filter sets
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compile `specs` into an OR of per-clause equality conjunctions.
    ///
    /// Empty clauses are skipped. If nothing remains, `filter_required` is
    /// false and the predicate accepts every item.
    pub fn compile(specs: &FilterSet) -> CompiledFilter {
        let clauses: Vec<Predicate> = specs
            .specs()
            .iter()
            .filter(|spec| !spec.is_empty())
            .map(compile_clause)
            .collect();

        if clauses.is_empty() {
            return CompiledFilter {
                filter_required: false,
                predicate: Predicate::always(),
            };
        }

        debug!("Compiled {} filter clause(s)", clauses.len());
        CompiledFilter {
            filter_required: true,
            predicate: Predicate::any(clauses),
        }
    }
}

fn compile_clause(spec: &FilterSpec) -> Predicate {
    let checks = spec
        .conditions()
        .map(|(field, value)| match scalar_string(value) {
            Some(expected) => Predicate::field_eq(field.clone(), expected),
            // Non-scalar expectations can never be met
            None => Predicate::never(),
        })
        .collect();
    Predicate::all(checks)
}

/// String form used for equality: strings as-is, numbers and booleans in
/// their JSON rendering, `null` as `"null"`. Arrays and objects have none.
pub fn scalar_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => Some("null".to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

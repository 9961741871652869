//! Item filtering
//!
//! A [`FilterSet`] is an ordered list of [`FilterSpec`] clauses. Each clause
//! is a flat `field == value` conjunction; the set matches an item when any
//! non-empty clause does. The [`FilterCompiler`] turns a set into a typed
//! [`Predicate`] built from composed closures.

mod compiler;
mod types;

pub use compiler::{scalar_string, CompiledFilter, FilterCompiler};
pub use types::{FilterSet, FilterSpec, Predicate};

#[cfg(test)]
mod tests;

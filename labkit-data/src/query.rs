//! Minimal query contract — a conjunction of equality predicates.

use labkit_model::{Entity, Value};

/// Equality-only query over a collection.
///
/// Stands in for the backend's query-builder capability; the core only needs
/// attribute-equals filtering (the mapping layer queries projects by name).
#[derive(Debug, Clone, Default)]
pub struct Query {
    predicates: Vec<(String, Value)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an `attribute == value` predicate.
    pub fn eq(mut self, attribute: &str, value: Value) -> Self {
        self.predicates.push((attribute.to_string(), value));
        self
    }

    /// Returns true if the entity satisfies every predicate.
    pub fn matches(&self, entity: &Entity) -> bool {
        self.predicates
            .iter()
            .all(|(attribute, value)| entity.get(attribute) == Some(value))
    }
}

//! The four-level mapping specification.
//!
//! A project owns targets, a target owns one entity mapping per source
//! collection, and an entity mapping owns one attribute mapping per target
//! attribute. Projects are authored by user workflows, persisted through a
//! [`MappingProjectRepository`](crate::MappingProjectRepository), and read
//! by the engine during apply.

use labkit_model::EntityType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maps one target attribute from a source-evaluatable expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeMapping {
    pub target_attribute: String,
    /// Expression handed to the algorithm evaluator together with the
    /// source entity and its schema.
    pub algorithm: String,
}

impl AttributeMapping {
    pub fn new(target_attribute: &str, algorithm: &str) -> Self {
        Self {
            target_attribute: target_attribute.to_string(),
            algorithm: algorithm.to_string(),
        }
    }
}

/// All attribute mappings for one source collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMapping {
    /// Name of the source collection.
    pub source: String,
    pub attribute_mappings: Vec<AttributeMapping>,
}

impl EntityMapping {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            attribute_mappings: Vec::new(),
        }
    }

    pub fn add_attribute_mapping(&mut self, mapping: AttributeMapping) {
        self.attribute_mappings.push(mapping);
    }

    pub fn with_attribute_mapping(mut self, mapping: AttributeMapping) -> Self {
        self.attribute_mappings.push(mapping);
        self
    }
}

/// One target collection and the source mappings feeding it.
///
/// Entity mappings apply in the order they were added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingTarget {
    pub target: EntityType,
    pub entity_mappings: Vec<EntityMapping>,
}

impl MappingTarget {
    pub fn new(target: EntityType) -> Self {
        Self {
            target,
            entity_mappings: Vec::new(),
        }
    }

    pub fn add_source(&mut self, mapping: EntityMapping) {
        self.entity_mappings.push(mapping);
    }

    pub fn with_source(mut self, mapping: EntityMapping) -> Self {
        self.entity_mappings.push(mapping);
        self
    }
}

/// A named, user-owned set of mapping targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingProject {
    pub identifier: String,
    pub name: String,
    pub targets: Vec<MappingTarget>,
}

impl MappingProject {
    /// Creates a project with a generated identifier.
    pub fn new(name: &str) -> Self {
        Self {
            identifier: Uuid::new_v4().to_string(),
            name: name.to_string(),
            targets: Vec::new(),
        }
    }

    pub fn add_target(&mut self, target: MappingTarget) {
        self.targets.push(target);
    }

    /// Re-identifies the project, e.g. when cloning.
    pub fn regenerate_identifier(&mut self) {
        self.identifier = Uuid::new_v4().to_string();
    }
}

//! Entity type — the named, ordered attribute set describing one collection.

use crate::{Attribute, ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Schema for one entity collection.
///
/// The attribute list is insertion-ordered and introspectable at runtime;
/// nothing in the engine is compiled against a concrete record shape.
/// The id is unique and immutable once the type is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    package: Option<String>,
    #[serde(default)]
    abstract_type: bool,
    attributes: Vec<Attribute>,
    id_attribute: String,
}

impl EntityType {
    /// Creates an entity type from an ordered attribute set.
    ///
    /// Validates the schema invariants up front: attribute names unique,
    /// reference attributes carrying a target, and the id attribute present.
    pub fn new(id: &str, id_attribute: &str, attributes: Vec<Attribute>) -> ModelResult<Self> {
        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(ModelError::DuplicateAttribute {
                    entity_type: id.to_string(),
                    attribute: attr.name.clone(),
                });
            }
            if attr.data_type.is_reference() && attr.ref_entity.is_none() {
                return Err(ModelError::MissingRefTarget {
                    attribute: attr.name.clone(),
                });
            }
        }
        if !attributes.iter().any(|a| a.name == id_attribute) {
            return Err(ModelError::MissingIdAttribute {
                entity_type: id.to_string(),
                attribute: id_attribute.to_string(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            label: None,
            package: None,
            abstract_type: false,
            attributes,
            id_attribute: id_attribute.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn is_abstract(&self) -> bool {
        self.abstract_type
    }

    /// Name of the identifier attribute.
    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Looks up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns true if any attribute references this type itself.
    ///
    /// Self-referencing collections need a second mapping pass: within-
    /// collection references cannot resolve before all rows exist.
    pub fn has_self_references(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| a.ref_entity.as_deref() == Some(self.id.as_str()))
    }

    /// Appends an attribute, enforcing name uniqueness and ref-target presence.
    pub fn add_attribute(&mut self, attribute: Attribute) -> ModelResult<()> {
        if self.attribute(&attribute.name).is_some() {
            return Err(ModelError::DuplicateAttribute {
                entity_type: self.id.clone(),
                attribute: attribute.name,
            });
        }
        if attribute.data_type.is_reference() && attribute.ref_entity.is_none() {
            return Err(ModelError::MissingRefTarget {
                attribute: attribute.name,
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Returns a copy of this type under a new collection id.
    ///
    /// Self-references follow the rename so the copy stays self-referencing
    /// rather than pointing back at the original collection.
    pub fn with_id(&self, id: &str) -> Self {
        let mut copy = self.clone();
        for attr in &mut copy.attributes {
            if attr.ref_entity.as_deref() == Some(self.id.as_str()) {
                attr.ref_entity = Some(id.to_string());
            }
        }
        copy.id = id.to_string();
        copy
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.abstract_type = true;
        self
    }
}

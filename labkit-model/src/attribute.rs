//! Attribute declarations — one column of a collection's schema.

use serde::{Deserialize, Serialize};

/// The declared data type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Long,
    Double,
    Bool,
    Date,
    DateTime,
    /// Single reference to a record in another (or the same) collection.
    Ref,
    /// Ordered multi-reference.
    MultiRef,
}

impl AttributeType {
    /// Returns true for the reference kinds.
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Ref | Self::MultiRef)
    }
}

/// One attribute of an [`EntityType`](crate::EntityType).
///
/// Reference attributes carry the id of the target collection; computed
/// attributes carry the expression an evaluator derives their value from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: AttributeType,
    /// Target collection id. Required for reference kinds, absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_entity: Option<String>,
    /// Expression for computed (derived, read-only) attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl Attribute {
    fn simple(name: &str, data_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            ref_entity: None,
            expression: None,
            nullable: true,
        }
    }

    /// Shorthand for a string attribute.
    pub fn string(name: &str) -> Self {
        Self::simple(name, AttributeType::String)
    }

    /// Shorthand for an integer attribute.
    pub fn int(name: &str) -> Self {
        Self::simple(name, AttributeType::Int)
    }

    /// Shorthand for a long attribute.
    pub fn long(name: &str) -> Self {
        Self::simple(name, AttributeType::Long)
    }

    /// Shorthand for a double attribute.
    pub fn double(name: &str) -> Self {
        Self::simple(name, AttributeType::Double)
    }

    /// Shorthand for a boolean attribute.
    pub fn bool(name: &str) -> Self {
        Self::simple(name, AttributeType::Bool)
    }

    /// Shorthand for a date attribute.
    pub fn date(name: &str) -> Self {
        Self::simple(name, AttributeType::Date)
    }

    /// Shorthand for a datetime attribute.
    pub fn datetime(name: &str) -> Self {
        Self::simple(name, AttributeType::DateTime)
    }

    /// Shorthand for a single-reference attribute targeting `ref_entity`.
    pub fn reference(name: &str, ref_entity: &str) -> Self {
        Self {
            ref_entity: Some(ref_entity.to_string()),
            ..Self::simple(name, AttributeType::Ref)
        }
    }

    /// Shorthand for a multi-reference attribute targeting `ref_entity`.
    pub fn multi_reference(name: &str, ref_entity: &str) -> Self {
        Self {
            ref_entity: Some(ref_entity.to_string()),
            ..Self::simple(name, AttributeType::MultiRef)
        }
    }

    /// Shorthand for a computed attribute derived from `expression`.
    pub fn computed(name: &str, data_type: AttributeType, expression: &str) -> Self {
        Self {
            expression: Some(expression.to_string()),
            ..Self::simple(name, data_type)
        }
    }

    /// Marks the attribute as non-nullable.
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Returns true if this attribute is derived from an expression.
    pub fn is_computed(&self) -> bool {
        self.expression.is_some()
    }
}

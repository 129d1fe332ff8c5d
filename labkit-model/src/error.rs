//! Error types for the entity model.

use crate::AttributeType;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur constructing or mutating model types.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The attribute is not declared on the entity type.
    #[error("unknown attribute [{attribute}] on entity type [{entity_type}]")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    /// A value's runtime type does not match the attribute's declared type.
    #[error("attribute [{attribute}] is declared {expected:?} but value is {actual:?}")]
    TypeMismatch {
        attribute: String,
        expected: AttributeType,
        actual: AttributeType,
    },

    /// Attribute names must be unique within an entity type.
    #[error("duplicate attribute [{attribute}] on entity type [{entity_type}]")]
    DuplicateAttribute {
        entity_type: String,
        attribute: String,
    },

    /// Reference attributes must name a target collection.
    #[error("reference attribute [{attribute}] has no target entity type")]
    MissingRefTarget { attribute: String },

    /// Null assigned to an attribute that is not nullable.
    #[error("attribute [{attribute}] is not nullable")]
    NotNullable { attribute: String },

    /// The declared id attribute is not part of the attribute set.
    #[error("entity type [{entity_type}] declares id attribute [{attribute}] which does not exist")]
    MissingIdAttribute {
        entity_type: String,
        attribute: String,
    },
}

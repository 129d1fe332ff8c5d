//! Error types for the mapping engine.

use labkit_data::DataError;
use labkit_model::{AttributeType, ModelError};
use thiserror::Error;

/// Result type for mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors that can occur in mapping operations.
#[derive(Debug, Error)]
pub enum MapperError {
    /// Repository or registry failure.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Schema invariant violation while building target metadata or entities.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Lookup of a mapping project that does not exist.
    #[error("mapping project [{id}] does not exist")]
    UnknownProject { id: String },

    /// The mapping target's schema cannot be written into the live target
    /// repository. Raised before any write.
    #[error(transparent)]
    Incompatible(#[from] Incompatibility),

    /// Expression evaluation failure for one attribute mapping.
    #[error("evaluating mapping for attribute [{attribute}]: {message}")]
    Evaluation { attribute: String, message: String },

    /// Permission grant failure from the security collaborator.
    #[error("permission error: {0}")]
    Permission(String),
}

/// One structural mismatch found by the target-schema compatibility check.
///
/// Carries enough detail to be user-diagnosable: the offending attribute,
/// both declared types, and for references both referenced collections.
#[derive(Debug, Error)]
pub enum Incompatibility {
    #[error("target repository does not contain the following attribute: {attribute}")]
    MissingAttribute { attribute: String },

    #[error(
        "attribute {attribute} in the mapping target is type {mapping_type:?} while attribute \
         {target_attribute} in the target repository is type {target_type:?}; the types must match"
    )]
    TypeMismatch {
        attribute: String,
        mapping_type: AttributeType,
        target_attribute: String,
        target_type: AttributeType,
    },

    #[error(
        "in the mapping target, attribute {attribute} references collection {mapping_ref} while \
         in the target repository attribute {target_attribute} references collection \
         {target_ref}; the referenced collections must match"
    )]
    RefEntityMismatch {
        attribute: String,
        mapping_ref: String,
        target_attribute: String,
        target_ref: String,
    },
}

//! Error types for the repository layer.

use labkit_model::ModelError;
use thiserror::Error;

/// Result type for repository operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors that can occur in repository and registry operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Schema invariant violation from the model layer.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Lookup of a collection name that was never registered.
    #[error("unknown entity collection [{name}]")]
    UnknownRepository { name: String },

    /// Operation on a collection name that was registered and then removed.
    #[error("entity collection [{name}] has been removed")]
    RepositoryRetired { name: String },

    /// Registration under a name that is already live.
    #[error("entity collection [{name}] is already registered")]
    DuplicateRepository { name: String },

    /// Lookup of a record id that does not exist in the collection.
    #[error("unknown entity [{id}] in collection [{entity_type}]")]
    UnknownEntity { entity_type: String, id: String },

    /// Insert of a record id that already exists in the collection.
    #[error("duplicate entity [{id}] in collection [{entity_type}]")]
    DuplicateEntity { entity_type: String, id: String },

    /// Entity written to a repository of a different collection.
    #[error("entity of type [{actual}] written to collection [{expected}]")]
    WrongEntityType { expected: String, actual: String },

    /// Entity written without an identifier value.
    #[error("entity of type [{entity_type}] has no id value")]
    MissingIdValue { entity_type: String },

    /// Attempted mutation of a derived attribute.
    #[error("attribute [{attribute}] is computed")]
    ComputedAttributeWrite { attribute: String },

    /// Expression evaluation failure.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Error propagated from the physical storage engine.
    #[error("storage error: {0}")]
    Storage(String),
}

//! Error types for the entity layer.

use thiserror::Error;

/// The primary error type for schema and record operations.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The named entity is not part of the domain.
    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },

    /// Two entities in one domain share a name.
    #[error("duplicate entity: {name}")]
    DuplicateEntity { name: String },

    /// The named column is not declared on the entity.
    #[error("unknown column {column:?} for entity {entity}")]
    UnknownColumn { entity: String, column: String },

    /// Type coercion failure.
    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

/// A text value that does not parse as its column's declared type.
#[derive(Error, Debug)]
#[error("cannot coerce {text:?} into {ty}")]
pub struct CoerceError {
    /// Type tag of the target column type.
    pub ty: &'static str,
    /// The offending text.
    pub text: String,
}

/// Result type alias for entity-layer operations.
pub type ModelResult<T> = Result<T, ModelError>;

//! Error types for XML encoding and decoding.
//!
//! Every failure is surfaced synchronously as one [`XmlError`] sub-reason;
//! nothing is retried internally, and no partially-constructed record is
//! returned.

use thiserror::Error;

use keel_model::{CoerceError, ModelError};

/// The primary error type for codec operations.
#[derive(Error, Debug)]
pub enum XmlError {
    /// An inclusion value that does not normalize: a blank name where an
    /// association or attribute name was expected.
    #[error("unsupported option type: {detail}")]
    UnsupportedOptionType { detail: String },

    /// An included name that is neither an association nor a readable
    /// attribute of the entity.
    #[error("cannot resolve included name {name:?} on entity {entity}")]
    UnresolvedInclusion { entity: String, name: String },

    /// An XML tag matching no column, opted-in association, or writable
    /// attribute.
    #[error("cannot resolve tag {tag:?} on entity {entity}")]
    UnresolvedTag { entity: String, tag: String },

    /// A name in the `associations` option that the entity does not
    /// declare as an association.
    #[error("unknown association {name:?} for entity {entity}")]
    UnknownAssociation { entity: String, name: String },

    /// A related record the options require to be present was absent from
    /// the document.
    #[error("missing associated record for {name:?} on entity {entity}")]
    MissingAssociation { entity: String, name: String },

    /// Writing a write-restricted column without `all_columns`.
    #[error("column {column:?} of entity {entity} is write-restricted")]
    RestrictedColumnWrite { entity: String, column: String },

    /// Collection-shaped input on the single-record entry point, or vice
    /// versa.
    #[error("document shape mismatch: {detail}")]
    ArrayMismatch { detail: String },

    /// A document with no root element, such as a lone XML declaration.
    #[error("document has no root element")]
    EmptyDocument,

    /// A collection source without an enumeration capability.
    #[error("source cannot produce rows for serialization")]
    UnreadableSource,

    /// Schema failure from the entity layer.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Malformed XML from the underlying parser.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// IO failure while writing the document.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoerceError> for XmlError {
    fn from(err: CoerceError) -> Self {
        XmlError::Model(ModelError::Coerce(err))
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, XmlError>;

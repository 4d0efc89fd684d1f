//! # Keel entity layer
//!
//! An in-memory entity layer: schema metadata (columns with declared
//! types, cardinality-typed associations, virtual attributes, and a
//! column access policy), typed scalar [`Value`]s with schema-driven text
//! coercion, and [`Record`] instances that carry column values and
//! association links.
//!
//! The layer owns no persistence; it exists so codecs such as
//! `keel-serde` can resolve tags against schema metadata, coerce text
//! into typed values, and materialize record graphs.

pub mod error;
pub mod record;
pub mod schema;
pub mod source;
pub mod value;

pub use error::{CoerceError, ModelError, ModelResult};
pub use record::{Associated, Record};
pub use schema::{
    AssociationDef, Cardinality, ColumnDef, Domain, DomainBuilder, EntityBuilder, EntityDef,
    EntityId,
};
pub use source::{MemoryDataset, RowSource};
pub use value::{ColumnType, Value};

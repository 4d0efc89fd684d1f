//! Row-producing sources for collection serialization.

use crate::record::Record;
use crate::schema::EntityId;

/// A source of rows for collection serialization.
///
/// `rows` returns `None` when the source cannot enumerate records (for
/// example a raw projection with no row shape); callers treat that as an
/// unreadable source.
pub trait RowSource {
    /// The entity every produced row belongs to.
    fn entity(&self) -> EntityId;

    /// The rows, or `None` if the source has no enumeration capability.
    fn rows(&self) -> Option<Vec<Record>>;
}

/// An in-memory [`RowSource`].
pub struct MemoryDataset {
    entity: EntityId,
    rows: Option<Vec<Record>>,
}

impl MemoryDataset {
    pub fn new(entity: EntityId, rows: Vec<Record>) -> Self {
        MemoryDataset {
            entity,
            rows: Some(rows),
        }
    }

    /// A dataset that cannot produce rows.
    pub fn unreadable(entity: EntityId) -> Self {
        MemoryDataset { entity, rows: None }
    }
}

impl RowSource for MemoryDataset {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn rows(&self) -> Option<Vec<Record>> {
        self.rows.clone()
    }
}

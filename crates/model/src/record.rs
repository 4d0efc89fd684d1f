//! Record instances: column values, virtual attributes, and association
//! links.

use indexmap::IndexMap;

use crate::error::{ModelError, ModelResult};
use crate::schema::{Domain, EntityId};
use crate::value::Value;

/// A link from a record to its related record(s).
#[derive(Clone, Debug, PartialEq)]
pub enum Associated {
    One(Box<Record>),
    Many(Vec<Record>),
}

/// One instance of a schema-defined entity.
///
/// Column values, virtual attributes, and association links all preserve
/// insertion order; equality is structural and order-independent.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    entity: EntityId,
    values: IndexMap<String, Value>,
    attributes: IndexMap<String, Value>,
    associations: IndexMap<String, Associated>,
}

impl Record {
    /// A record with no values set.
    pub fn new(entity: EntityId) -> Self {
        Record {
            entity,
            values: IndexMap::new(),
            attributes: IndexMap::new(),
            associations: IndexMap::new(),
        }
    }

    /// Build a record from already-typed column values, bypassing schema
    /// validation. Used for data that is already in persisted shape.
    pub fn load<K, V>(entity: EntityId, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Record::new(entity);
        for (name, value) in values {
            record.values.insert(name.into(), value.into());
        }
        record
    }

    /// Build a record from column values, rejecting names the schema does
    /// not declare.
    pub fn construct<K, V>(
        domain: &Domain,
        entity: EntityId,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> ModelResult<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let def = domain.entity(entity);
        let mut record = Record::new(entity);
        for (name, value) in values {
            let name = name.into();
            if def.column(&name).is_none() {
                return Err(ModelError::UnknownColumn {
                    entity: def.name().to_owned(),
                    column: name,
                });
            }
            record.values.insert(name, value.into());
        }
        Ok(record)
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn set_value(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Column values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn association(&self, name: &str) -> Option<&Associated> {
        self.associations.get(name)
    }

    /// Set an association link directly, without any storage round trip.
    pub fn set_association(&mut self, name: impl Into<String>, related: Associated) {
        self.associations.insert(name.into(), related);
    }

    /// The related record of a singular association, if linked.
    pub fn one(&self, name: &str) -> Option<&Record> {
        match self.associations.get(name)? {
            Associated::One(record) => Some(record),
            Associated::Many(_) => None,
        }
    }

    /// The related records of a plural association, if linked.
    pub fn many(&self, name: &str) -> Option<&[Record]> {
        match self.associations.get(name)? {
            Associated::Many(records) => Some(records),
            Associated::One(_) => None,
        }
    }
}

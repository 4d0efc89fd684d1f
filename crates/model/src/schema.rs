//! Entity schema metadata: columns, associations, virtual attributes, and
//! the column access policy.
//!
//! A [`Domain`] is the closed universe of entity definitions. Association
//! targets are declared by name and resolved to [`EntityId`]s when the
//! domain is built, so lookups never fail after construction.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::value::ColumnType;

/// Identifies an entity within its [`Domain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub(crate) usize);

/// How many related records an association carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// One declared column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
}

/// One declared association.
#[derive(Clone, Debug, PartialEq)]
pub struct AssociationDef {
    pub name: String,
    pub cardinality: Cardinality,
    pub target: EntityId,
}

/// Schema of a single entity.
#[derive(Debug)]
pub struct EntityDef {
    name: String,
    columns: Vec<ColumnDef>,
    associations: Vec<AssociationDef>,
    attributes: Vec<String>,
    restricted: HashSet<String>,
}

impl EntityDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn associations(&self) -> &[AssociationDef] {
        &self.associations
    }

    pub fn association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Whether `name` is a declared virtual attribute (a readable and
    /// writable non-column member).
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    /// Whether the column is write-restricted by the access policy.
    pub fn is_restricted(&self, column: &str) -> bool {
        self.restricted.contains(column)
    }
}

/// The closed set of entity definitions one codec call operates over.
#[derive(Debug)]
pub struct Domain {
    entities: Vec<EntityDef>,
    by_name: HashMap<String, EntityId>,
}

impl Domain {
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    pub fn entity(&self, id: EntityId) -> &EntityDef {
        &self.entities[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn entity_named(&self, name: &str) -> ModelResult<EntityId> {
        self.lookup(name).ok_or_else(|| ModelError::UnknownEntity {
            name: name.to_owned(),
        })
    }
}

/// Declares the entities of a [`Domain`].
#[derive(Default)]
pub struct DomainBuilder {
    entities: Vec<EntityBuilder>,
}

impl DomainBuilder {
    pub fn entity(mut self, entity: EntityBuilder) -> Self {
        self.entities.push(entity);
        self
    }

    /// Resolve association targets and freeze the domain.
    pub fn build(self) -> ModelResult<Domain> {
        let mut by_name = HashMap::new();
        for (index, entity) in self.entities.iter().enumerate() {
            if by_name.insert(entity.name.clone(), EntityId(index)).is_some() {
                return Err(ModelError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }
        }

        let mut entities = Vec::with_capacity(self.entities.len());
        for entity in self.entities {
            let mut associations = Vec::with_capacity(entity.associations.len());
            for (name, cardinality, target) in entity.associations {
                let target = *by_name
                    .get(&target)
                    .ok_or(ModelError::UnknownEntity { name: target })?;
                associations.push(AssociationDef {
                    name,
                    cardinality,
                    target,
                });
            }
            entities.push(EntityDef {
                name: entity.name,
                columns: entity.columns,
                associations,
                attributes: entity.attributes,
                restricted: entity.restricted.into_iter().collect(),
            });
        }

        Ok(Domain { entities, by_name })
    }
}

/// Declares one entity: columns, associations, virtual attributes, and
/// write-restricted columns.
pub struct EntityBuilder {
    name: String,
    columns: Vec<ColumnDef>,
    associations: Vec<(String, Cardinality, String)>,
    attributes: Vec<String>,
    restricted: Vec<String>,
}

impl EntityBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        EntityBuilder {
            name: name.into(),
            columns: Vec::new(),
            associations: Vec::new(),
            attributes: Vec::new(),
            restricted: Vec::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            ty,
        });
        self
    }

    /// Declare a plural association to `target`.
    pub fn has_many(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.associations
            .push((name.into(), Cardinality::Many, target.into()));
        self
    }

    /// Declare a singular association to `target`.
    pub fn belongs_to(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.associations
            .push((name.into(), Cardinality::One, target.into()));
        self
    }

    /// Declare a virtual attribute: a readable and writable member that is
    /// not backed by a column.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Mark a column write-restricted.
    pub fn restrict(mut self, column: impl Into<String>) -> Self {
        self.restricted.push(column.into());
        self
    }
}

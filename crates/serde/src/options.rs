//! The option model: selection, inclusion, naming, and typing
//! configuration for one codec call.
//!
//! The caller-facing inclusion value is the recursive [`IncludeSpec`] sum
//! type (a name, a sequence, or a mapping to nested options). It is
//! normalized once at call entry into a canonical name-to-options map, so
//! both codec directions walk the same shape. Options are never shared
//! between recursion levels; each nested level carries its own
//! [`XmlOptions`].

use indexmap::IndexMap;

use keel_model::{EntityDef, Record};

use crate::error::{Result, XmlError};
use crate::naming::NameTransform;

/// Passthrough configuration for the XML writer.
#[derive(Clone, Debug, Default)]
pub struct BuilderConfig {
    /// `encoding` attribute for the XML declaration.
    pub encoding: Option<String>,
    /// Spaces of indentation per nesting level; `None` writes compact
    /// output.
    pub indent: Option<usize>,
}

/// What to do when a singular association tag carries no record data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Build the related record from the tag's children.
    #[default]
    Construct,
    /// Fail: the caller requires the related record to be present in the
    /// document.
    Raise,
}

/// Configuration for one serialize or deserialize call.
///
/// Immutable for the duration of the call. `associations`, `all_columns`,
/// and `missing` drive deserialization only; `include`, `types`,
/// `root_name`, `array_root_name`, `array`, and the writer passthrough
/// drive serialization only. Everything else applies symmetrically.
#[derive(Clone, Debug, Default)]
pub struct XmlOptions {
    /// Restrict emitted columns to exactly this set.
    pub only: Option<Vec<String>>,
    /// Columns to exclude, applied after `only`.
    pub except: Option<Vec<String>>,
    /// Associations and readable attributes to emit.
    pub include: Option<IncludeSpec>,
    /// Tags the deserializer may treat as associations, with the nested
    /// options each recursion uses.
    pub associations: Option<IncludeSpec>,
    /// Include every declared association with default nested options,
    /// unless a more specific entry exists.
    pub all_associations: bool,
    /// Tag-name transform; the caller supplies the matching direction on
    /// each side.
    pub name_transform: NameTransform,
    /// Emit a `type` attribute with each scalar column.
    pub types: bool,
    /// Root element override for single-record serialization.
    pub root_name: Option<String>,
    /// Root element override for collection serialization; defaults to the
    /// pluralized single-record root.
    pub array_root_name: Option<String>,
    /// Bypass the write-restriction policy for this call.
    pub all_columns: bool,
    /// Policy for a referenced-but-absent related record.
    pub missing: MissingPolicy,
    /// Literal rows substituted for the collection source.
    pub array: Option<Vec<Record>>,
    /// `encoding` attribute for the XML declaration; `builder.encoding`
    /// is the fallback.
    pub encoding: Option<String>,
    /// Writer passthrough.
    pub builder: BuilderConfig,
}

/// The raw, possibly-nested inclusion value: a single name, a sequence of
/// specs, or a mapping from name to the nested options used when cascading
/// into that member.
#[derive(Clone, Debug)]
pub enum IncludeSpec {
    Name(String),
    List(Vec<IncludeSpec>),
    Map(IndexMap<String, XmlOptions>),
}

impl IncludeSpec {
    pub fn name(name: impl Into<String>) -> Self {
        IncludeSpec::Name(name.into())
    }

    /// A sequence of bare names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IncludeSpec::List(names.into_iter().map(|n| IncludeSpec::Name(n.into())).collect())
    }

    /// A mapping from name to nested options.
    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, XmlOptions)>,
        S: Into<String>,
    {
        IncludeSpec::Map(entries.into_iter().map(|(n, o)| (n.into(), o)).collect())
    }
}

impl From<&str> for IncludeSpec {
    fn from(name: &str) -> Self {
        IncludeSpec::Name(name.to_owned())
    }
}

impl From<String> for IncludeSpec {
    fn from(name: String) -> Self {
        IncludeSpec::Name(name)
    }
}

impl XmlOptions {
    /// Canonical inclusion map for the serialize path.
    ///
    /// Merged-in `all_associations` entries carry default options, so the
    /// walk goes exactly one level deep unless the caller nested further.
    pub(crate) fn normalized_include(
        &self,
        entity: &EntityDef,
    ) -> Result<IndexMap<String, XmlOptions>> {
        let mut map = match &self.include {
            Some(spec) => normalize(spec)?,
            None => IndexMap::new(),
        };
        if self.all_associations {
            for assoc in entity.associations() {
                if !map.contains_key(&assoc.name) {
                    map.insert(assoc.name.clone(), XmlOptions::default());
                }
            }
        }
        Ok(map)
    }

    /// Canonical association map for the deserialize path.
    ///
    /// Merged-in `all_associations` entries keep the flag set, so a
    /// document serialized with explicitly cascaded includes parses with
    /// the single flag. Every key must name a declared association.
    pub(crate) fn normalized_associations(
        &self,
        entity: &EntityDef,
    ) -> Result<IndexMap<String, XmlOptions>> {
        let mut map = match &self.associations {
            Some(spec) => normalize(spec)?,
            None => IndexMap::new(),
        };
        if self.all_associations {
            for assoc in entity.associations() {
                if !map.contains_key(&assoc.name) {
                    map.insert(
                        assoc.name.clone(),
                        XmlOptions {
                            all_associations: true,
                            ..XmlOptions::default()
                        },
                    );
                }
            }
        }
        for name in map.keys() {
            if entity.association(name).is_none() {
                return Err(XmlError::UnknownAssociation {
                    entity: entity.name().to_owned(),
                    name: name.clone(),
                });
            }
        }
        Ok(map)
    }
}

/// Normalize an inclusion spec into the canonical name-to-options map.
///
/// A bare name maps to default options; sequences flatten element-wise
/// with later entries overriding earlier ones; mapping values are used
/// as-is (an empty nested map value means default options).
fn normalize(spec: &IncludeSpec) -> Result<IndexMap<String, XmlOptions>> {
    let mut map = IndexMap::new();
    flatten(spec, &mut map)?;
    Ok(map)
}

fn flatten(spec: &IncludeSpec, into: &mut IndexMap<String, XmlOptions>) -> Result<()> {
    match spec {
        IncludeSpec::Name(name) => {
            checked_name(name)?;
            into.insert(name.clone(), XmlOptions::default());
        }
        IncludeSpec::List(items) => {
            for item in items {
                flatten(item, into)?;
            }
        }
        IncludeSpec::Map(entries) => {
            for (name, options) in entries {
                checked_name(name)?;
                into.insert(name.clone(), options.clone());
            }
        }
    }
    Ok(())
}

fn checked_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(XmlError::UnsupportedOptionType {
            detail: "blank name in inclusion spec".to_owned(),
        });
    }
    Ok(())
}

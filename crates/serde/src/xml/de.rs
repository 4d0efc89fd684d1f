//! XML deserialization: parses a document into an owned element tree and
//! reconstructs a record graph per the option model.
//!
//! Tag resolution follows a fixed priority order: declared column
//! (schema-coerced), name opted in through the `associations` map
//! (recursed with its nested options), then writable virtual attribute.
//! The record is materialized only after its whole element resolves, so a
//! failed parse never returns a partially-built record.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use keel_model::{Associated, Cardinality, ColumnDef, Domain, EntityDef, EntityId, Record, Value};

use crate::error::{Result, XmlError};
use crate::options::{MissingPolicy, XmlOptions};

/// Deserialize one record from an XML document.
///
/// The root element's own tag name is ignored; only its children are
/// resolved against the entity schema. Collection-shaped input fails with
/// [`XmlError::ArrayMismatch`].
pub fn from_xml(
    domain: &Domain,
    entity: EntityId,
    xml: &str,
    options: &XmlOptions,
) -> Result<Record> {
    debug!(entity = domain.entity(entity).name(), "deserializing record from xml");
    let root = read_root(xml)?.ok_or(XmlError::EmptyDocument)?;
    Deserializer { domain }.record_from_element(entity, &root, options, true)
}

/// Deserialize an ordered sequence of records from a collection document.
///
/// Every child of the root must be record-shaped; single-record input
/// fails with [`XmlError::ArrayMismatch`]. An empty wrapper yields an
/// empty sequence.
pub fn from_xml_many(
    domain: &Domain,
    entity: EntityId,
    xml: &str,
    options: &XmlOptions,
) -> Result<Vec<Record>> {
    debug!(entity = domain.entity(entity).name(), "deserializing collection from xml");
    let root = read_root(xml)?.ok_or(XmlError::EmptyDocument)?;
    if root.children.is_empty() && root.has_text() {
        return Err(XmlError::ArrayMismatch {
            detail: format!("root <{}> carries text instead of record elements", root.name),
        });
    }
    let deserializer = Deserializer { domain };
    let mut records = Vec::with_capacity(root.children.len());
    for child in &root.children {
        if child.is_leaf() && child.has_text() {
            return Err(XmlError::ArrayMismatch {
                detail: format!("element <{}> is not record-shaped", child.name),
            });
        }
        records.push(deserializer.record_from_element(entity, child, options, false)?);
    }
    Ok(records)
}

/// Resolve columns and virtual attributes from an XML document onto an
/// existing record, for partial updates. Association tags are not
/// resolved here.
///
/// Mutates in place: members resolved before a failing tag remain
/// applied when an error is returned.
pub fn apply_from_xml(
    domain: &Domain,
    record: &mut Record,
    xml: &str,
    options: &XmlOptions,
) -> Result<()> {
    let entity = domain.entity(record.entity());
    debug!(entity = entity.name(), "applying xml to record");
    let root = read_root(xml)?.ok_or(XmlError::EmptyDocument)?;
    for child in &root.children {
        let member = options.name_transform.apply(&child.name);
        if let Some(column) = entity.column(&member) {
            check_restriction(entity, &member, options)?;
            let value = coerce_element(column, child)?;
            record.set_value(member, value);
        } else if entity.has_attribute(&member) {
            record.set_attribute(member, element_text_value(child));
        } else {
            return Err(XmlError::UnresolvedTag {
                entity: entity.name().to_owned(),
                tag: child.name.clone(),
            });
        }
    }
    Ok(())
}

struct Deserializer<'a> {
    domain: &'a Domain,
}

impl Deserializer<'_> {
    fn record_from_element(
        &self,
        entity_id: EntityId,
        element: &Element,
        options: &XmlOptions,
        at_root: bool,
    ) -> Result<Record> {
        let entity = self.domain.entity(entity_id);
        let associations = options.normalized_associations(entity)?;

        let mut values: Vec<(String, Value)> = Vec::new();
        let mut attributes: Vec<(String, Value)> = Vec::new();
        let mut links: Vec<(String, Associated)> = Vec::new();

        for child in &element.children {
            let member = options.name_transform.apply(&child.name);
            if let Some(column) = entity.column(&member) {
                check_restriction(entity, &member, options)?;
                values.push((member, coerce_element(column, child)?));
            } else if let (Some(child_options), Some(assoc)) =
                (associations.get(&member), entity.association(&member))
            {
                match assoc.cardinality {
                    Cardinality::Many => {
                        let mut related = Vec::with_capacity(child.children.len());
                        for sub in &child.children {
                            related.push(self.record_from_element(
                                assoc.target,
                                sub,
                                child_options,
                                false,
                            )?);
                        }
                        links.push((member, Associated::Many(related)));
                    }
                    Cardinality::One => {
                        if child.is_leaf()
                            && !child.has_text()
                            && child_options.missing == MissingPolicy::Raise
                        {
                            return Err(XmlError::MissingAssociation {
                                entity: entity.name().to_owned(),
                                name: member,
                            });
                        }
                        let related =
                            self.record_from_element(assoc.target, child, child_options, false)?;
                        links.push((member, Associated::One(Box::new(related))));
                    }
                }
            } else if entity.has_attribute(&member) {
                attributes.push((member, element_text_value(child)));
            } else {
                return Err(unresolved(entity, element, child, at_root));
            }
        }

        let mut record = Record::load(entity_id, values);
        for (name, value) in attributes {
            record.set_attribute(name, value);
        }
        for (name, link) in links {
            record.set_association(name, link);
        }
        Ok(record)
    }
}

fn check_restriction(entity: &EntityDef, column: &str, options: &XmlOptions) -> Result<()> {
    if entity.is_restricted(column) && !options.all_columns {
        return Err(XmlError::RestrictedColumnWrite {
            entity: entity.name().to_owned(),
            column: column.to_owned(),
        });
    }
    Ok(())
}

fn coerce_element(column: &ColumnDef, element: &Element) -> Result<Value> {
    if element.attr("nil").is_some() {
        return Ok(Value::Nil);
    }
    Ok(column.ty.coerce(&element.text)?)
}

fn element_text_value(element: &Element) -> Value {
    if element.attr("nil").is_some() {
        Value::Nil
    } else {
        Value::String(element.text.clone())
    }
}

fn unresolved(entity: &EntityDef, root: &Element, child: &Element, at_root: bool) -> XmlError {
    if at_root && looks_like_collection(root) {
        return XmlError::ArrayMismatch {
            detail: format!(
                "root <{}> wraps a collection of <{}> elements",
                root.name, child.name
            ),
        };
    }
    XmlError::UnresolvedTag {
        entity: entity.name().to_owned(),
        tag: child.name.clone(),
    }
}

/// A collection document wraps repeated record-shaped elements that share
/// one tag name under a root named by that tag's plural.
fn looks_like_collection(root: &Element) -> bool {
    let Some(first) = root.children.first() else {
        return false;
    };
    let homogeneous = root
        .children
        .iter()
        .all(|c| c.name == first.name && !(c.is_leaf() && c.has_text()));
    homogeneous && root.name == pluralizer::pluralize(&first.name, 2, false)
}

/// An owned XML element: tag, attributes, concatenated character data,
/// and ordered element children.
#[derive(Clone, Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Parse a document into its root element, skipping the declaration,
/// comments, processing instructions, and doctype. Returns `None` for a
/// document with no root element.
fn read_root(xml: &str) -> Result<Option<Element>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(Some(element)),
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(Some(element)),
                    }
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Event::Decl(_)
            | Event::Comment(_)
            | Event::PI(_)
            | Event::DocType(_) => {}
            Event::Eof => return Ok(None),
        }
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

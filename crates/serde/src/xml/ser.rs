//! XML serialization: walks a record (or collection) plus an option model
//! and writes quick-xml events directly to the output buffer.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use keel_model::{Associated, Domain, EntityId, Record, RowSource, Value};

use crate::error::{Result, XmlError};
use crate::options::XmlOptions;

/// Serialize one record to an XML document.
///
/// # Examples
///
/// ```ignore
/// use keel_serde::{to_xml, XmlOptions};
///
/// let xml = to_xml(&domain, &artist, &XmlOptions::default())?;
/// assert_eq!(xml, r#"<?xml version="1.0"?><artist><id>2</id><name>YJM</name></artist>"#);
/// ```
pub fn to_xml(domain: &Domain, record: &Record, options: &XmlOptions) -> Result<String> {
    debug!(
        entity = domain.entity(record.entity()).name(),
        "serializing record to xml"
    );
    let mut writer = new_writer(options);
    write_declaration(&mut writer, options)?;
    Serializer { domain }.write_record(&mut writer, record, options, None)?;
    Ok(finish(writer))
}

/// Serialize an ordered sequence of records under a collection root.
pub fn to_xml_many(
    domain: &Domain,
    entity: EntityId,
    records: &[Record],
    options: &XmlOptions,
) -> Result<String> {
    let def = domain.entity(entity);
    debug!(entity = def.name(), rows = records.len(), "serializing collection to xml");

    let singular = options
        .root_name
        .clone()
        .unwrap_or_else(|| def.name().to_owned());
    let raw_root = options
        .array_root_name
        .clone()
        .unwrap_or_else(|| pluralizer::pluralize(&singular, 2, false));
    let tag = options.name_transform.apply(&raw_root);

    let mut writer = new_writer(options);
    write_declaration(&mut writer, options)?;
    writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
    let serializer = Serializer { domain };
    for record in records {
        serializer.write_record(&mut writer, record, options, None)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(finish(writer))
}

/// Serialize the rows of a dataset-like source.
///
/// The `array` option substitutes a literal sequence for the source's
/// rows; without it, a source that cannot enumerate rows fails with
/// [`XmlError::UnreadableSource`].
pub fn to_xml_dataset(
    domain: &Domain,
    source: &dyn RowSource,
    options: &XmlOptions,
) -> Result<String> {
    let rows = match &options.array {
        Some(rows) => rows.clone(),
        None => source.rows().ok_or(XmlError::UnreadableSource)?,
    };
    to_xml_many(domain, source.entity(), &rows, options)
}

struct Serializer<'a> {
    domain: &'a Domain,
}

impl Serializer<'_> {
    /// Write one record element. `root_override` carries an
    /// already-transformed tag when the element stands in for a singular
    /// association.
    fn write_record(
        &self,
        writer: &mut Writer<Vec<u8>>,
        record: &Record,
        options: &XmlOptions,
        root_override: Option<&str>,
    ) -> Result<()> {
        let entity = self.domain.entity(record.entity());
        let tag = match root_override {
            Some(tag) => tag.to_owned(),
            None => options
                .name_transform
                .apply(options.root_name.as_deref().unwrap_or(entity.name())),
        };
        let includes = options.normalized_include(entity)?;

        writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;

        // Emitted columns: schema order, present on the record, restricted
        // to `only`, minus `except`.
        for column in entity.columns() {
            if !column_selected(&column.name, options) {
                continue;
            }
            let Some(value) = record.value(&column.name) else {
                continue;
            };
            let child_tag = options.name_transform.apply(&column.name);
            let type_tag = options.types.then_some(column.ty.type_tag());
            write_scalar(writer, &child_tag, value, type_tag)?;
        }

        for (name, child_options) in &includes {
            if entity.association(name).is_some() {
                let Some(linked) = record.association(name) else {
                    continue;
                };
                let wrapper = options.name_transform.apply(name);
                match linked {
                    Associated::Many(related) => {
                        writer.write_event(Event::Start(BytesStart::new(wrapper.as_str())))?;
                        for record in related {
                            self.write_record(writer, record, child_options, None)?;
                        }
                        writer.write_event(Event::End(BytesEnd::new(wrapper.as_str())))?;
                    }
                    Associated::One(related) => {
                        self.write_record(writer, related, child_options, Some(&wrapper))?;
                    }
                }
            } else if entity.has_attribute(name) {
                let child_tag = options.name_transform.apply(name);
                let value = record.attribute(name).cloned().unwrap_or(Value::Nil);
                write_scalar(writer, &child_tag, &value, None)?;
            } else {
                return Err(XmlError::UnresolvedInclusion {
                    entity: entity.name().to_owned(),
                    name: name.clone(),
                });
            }
        }

        writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        Ok(())
    }
}

/// Write one scalar child element. Nil values become an empty element
/// marked `nil="true"` so they stay distinguishable from empty strings.
fn write_scalar(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    value: &Value,
    type_tag: Option<&str>,
) -> Result<()> {
    let mut start = BytesStart::new(tag);
    if let Some(type_tag) = type_tag {
        start.push_attribute(("type", type_tag));
    }
    if value.is_nil() {
        start.push_attribute(("nil", "true"));
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let text = value.to_string();
    writer.write_event(Event::Start(start))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn column_selected(name: &str, options: &XmlOptions) -> bool {
    if let Some(only) = &options.only {
        if !only.iter().any(|c| c == name) {
            return false;
        }
    }
    if let Some(except) = &options.except {
        if except.iter().any(|c| c == name) {
            return false;
        }
    }
    true
}

fn new_writer(options: &XmlOptions) -> Writer<Vec<u8>> {
    match options.builder.indent {
        Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
        None => Writer::new(Vec::new()),
    }
}

fn write_declaration(writer: &mut Writer<Vec<u8>>, options: &XmlOptions) -> Result<()> {
    let encoding = options
        .encoding
        .as_deref()
        .or(options.builder.encoding.as_deref());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", encoding, None)))?;
    Ok(())
}

fn finish(writer: Writer<Vec<u8>>) -> String {
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

//! XML serialization and deserialization for keel records.
//!
//! Both directions are stateless per call and walk the same normalized
//! option shape:
//!
//! - **Serialization** walks a record (or collection) plus an option
//!   model and writes quick-xml events directly: one child element per
//!   present column, then one element per included association or
//!   readable attribute, recursing with the nested options.
//!
//! - **Deserialization** parses the document into an owned element tree,
//!   inverts the naming transform on each tag, and resolves it in
//!   priority order — declared column (schema-coerced), opted-in
//!   association (recursed), writable attribute — reconstructing the
//!   record graph without touching storage.
//!
//! ## Wire shape
//!
//! | Record state | XML |
//! |--------------|-----|
//! | `name = "YJM"` | `<name>YJM</name>` |
//! | `name = ""` | `<name></name>` |
//! | `name` nil | `<name nil="true"/>` |
//! | `name` column absent | no element |
//! | plural association | `<albums><album>…</album></albums>` |
//! | singular association | `<artist>…</artist>` |
//!
//! With `types` set, scalar elements additionally carry the schema type
//! tag: `<id type="integer">2</id>`.

pub mod de;
pub mod ser;

pub use de::{apply_from_xml, from_xml, from_xml_many};
pub use ser::{to_xml, to_xml_dataset, to_xml_many};

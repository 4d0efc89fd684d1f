//! # Keel XML serialization
//!
//! A configurable, bidirectional XML codec for keel records. Field
//! selection, naming transforms, type annotation, and recursive inclusion
//! of associated records are all driven by one [`XmlOptions`] value, and
//! serialization and deserialization are exact inverses under a matched
//! pair of option models.
//!
//! ## Serializing
//!
//! ```ignore
//! use keel_serde::{to_xml, IncludeSpec, XmlOptions};
//!
//! let options = XmlOptions {
//!     include: Some(IncludeSpec::name("albums")),
//!     ..XmlOptions::default()
//! };
//! let xml = to_xml(&domain, &artist, &options)?;
//! ```
//!
//! ## Deserializing
//!
//! ```ignore
//! use keel_serde::{from_xml, IncludeSpec, XmlOptions};
//!
//! let options = XmlOptions {
//!     associations: Some(IncludeSpec::name("albums")),
//!     ..XmlOptions::default()
//! };
//! let artist = from_xml(&domain, artist_id, &xml, &options)?;
//! ```
//!
//! Both directions are stateless per call: nested recursion carries a
//! freshly derived option model, and concurrent calls on disjoint records
//! never interfere. `apply_from_xml` is the one in-place operation; see
//! its documentation for the partial-update caveat.

pub mod error;
pub mod naming;
pub mod options;
pub mod xml;

pub use error::{Result, XmlError};
pub use naming::NameTransform;
pub use options::{BuilderConfig, IncludeSpec, MissingPolicy, XmlOptions};
pub use xml::de::{apply_from_xml, from_xml, from_xml_many};
pub use xml::ser::{to_xml, to_xml_dataset, to_xml_many};

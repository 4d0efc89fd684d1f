//! Tag-name transforms.
//!
//! A transform is applied to every emitted tag name on the serialize path
//! and to every incoming tag name before member resolution on the
//! deserialize path. Symmetry comes from the caller supplying the matching
//! direction: `Camelize` or `Dasherize` out is paired with `Underscore`
//! in, and a reversible `Custom` function is used for both directions.

use std::fmt;
use std::sync::Arc;

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};

/// Transform applied to tag names.
#[derive(Clone, Default)]
pub enum NameTransform {
    /// Use member names as-is.
    #[default]
    Identity,
    /// `artist_id` becomes `ArtistId`.
    Camelize,
    /// `artist_id` becomes `artist-id`.
    Dasherize,
    /// `ArtistId` and `artist-id` become `artist_id`.
    Underscore,
    /// A caller-supplied transform.
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl NameTransform {
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        NameTransform::Custom(Arc::new(f))
    }

    pub fn apply(&self, name: &str) -> String {
        match self {
            NameTransform::Identity => name.to_owned(),
            NameTransform::Camelize => name.to_upper_camel_case(),
            NameTransform::Dasherize => name.to_kebab_case(),
            NameTransform::Underscore => name.to_snake_case(),
            NameTransform::Custom(f) => f(name),
        }
    }
}

impl fmt::Debug for NameTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTransform::Identity => f.write_str("Identity"),
            NameTransform::Camelize => f.write_str("Camelize"),
            NameTransform::Dasherize => f.write_str("Dasherize"),
            NameTransform::Underscore => f.write_str("Underscore"),
            NameTransform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

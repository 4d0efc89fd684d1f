//! Scalar column values and schema-driven text coercion.
//!
//! The wire form of every scalar is plain element text; [`ColumnType::coerce`]
//! parses that text back into a typed [`Value`] and is the exact inverse of
//! [`Value`]'s `Display` form.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoerceError;

/// Declared type of a schema column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Decimal,
    Boolean,
    String,
    Date,
    DateTime,
}

impl ColumnType {
    /// The wire string used for `type` attributes.
    pub fn type_tag(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
        }
    }

    /// Coerce element text into a typed value.
    ///
    /// Empty text means the element carried no character data: every type
    /// except `String` reads that as nil.
    pub fn coerce(self, text: &str) -> Result<Value, CoerceError> {
        if text.is_empty() {
            return Ok(match self {
                ColumnType::String => Value::String(String::new()),
                _ => Value::Nil,
            });
        }
        match self {
            ColumnType::Integer => text
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.coerce_error(text)),
            ColumnType::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.coerce_error(text)),
            ColumnType::Decimal => text
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| self.coerce_error(text)),
            ColumnType::Boolean => match text {
                "true" | "t" | "1" => Ok(Value::Bool(true)),
                "false" | "f" | "0" => Ok(Value::Bool(false)),
                _ => Err(self.coerce_error(text)),
            },
            ColumnType::String => Ok(Value::String(text.to_owned())),
            ColumnType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| self.coerce_error(text)),
            ColumnType::DateTime => DateTime::parse_from_rfc3339(text)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| self.coerce_error(text)),
        }
    }

    fn coerce_error(self, text: &str) -> CoerceError {
        CoerceError {
            ty: self.type_tag(),
            text: text.to_owned(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// One scalar column or attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl fmt::Display for Value {
    /// The element-text form; [`ColumnType::coerce`] inverts it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

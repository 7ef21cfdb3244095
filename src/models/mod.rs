mod organization;

pub use organization::*;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed field value, as read from input or from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Value::Null),
            ValueRef::Integer(i) => Ok(Value::Integer(i)),
            ValueRef::Text(_) => value.as_str().map(|s| Value::Text(s.to_string())),
            ValueRef::Real(_) | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Char { max_length: usize },
    Text,
    Integer,
    Slug { max_length: usize },
}

impl FieldKind {
    /// Free-form text fields, the ones subject to content sanitizing.
    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Char { .. } | FieldKind::Text)
    }

    pub fn max_length(&self) -> Option<usize> {
        match *self {
            FieldKind::Char { max_length } | FieldKind::Slug { max_length } => Some(max_length),
            FieldKind::Text | FieldKind::Integer => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub blank: bool,
    pub null: bool,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            blank: false,
            null: false,
        }
    }

    pub const fn char(name: &'static str, max_length: usize) -> Self {
        Self::new(name, FieldKind::Char { max_length })
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn slug(name: &'static str, max_length: usize) -> Self {
        Self::new(name, FieldKind::Slug { max_length })
    }

    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    pub const fn null(mut self) -> Self {
        self.null = true;
        self
    }
}

/// A row type stored in one table, described by a static field schema.
pub trait Record {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str = "id";
    const FIELDS: &'static [Field];

    /// Current value of `field`; unknown fields read as `Value::Null`.
    fn value(&self, field: &str) -> Value;

    fn field(name: &str) -> Option<&'static Field> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// Records whose primary key is a random string assigned on first save.
pub trait RandomIdRecord: Record {
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: Option<String>);
}

/// Records carrying a unique slug derived from their name.
pub trait SlugRecord: Record {
    fn name(&self) -> &str;
    fn slug(&self) -> &str;
    fn set_slug(&mut self, slug: String);

    /// True until the record has a persisted identity.
    fn is_new(&self) -> bool;

    /// Slug as of the last load or successful save.
    fn persisted_slug(&self) -> Option<&str>;
    fn mark_slug_persisted(&mut self);

    fn slug_max_length() -> usize {
        Self::field("slug")
            .and_then(|f| f.kind.max_length())
            .unwrap_or(crate::services::slug::DEFAULT_SLUG_MAX_LENGTH)
    }
}

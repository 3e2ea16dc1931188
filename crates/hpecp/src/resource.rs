//! Resource model: field registration tables and the immutable [`Resource`].
//!
//! Each resource kind declares its fields once, as a static table mapping a
//! logical column name to an accessor over the wire payload. Rendering and
//! projection look columns up by name in that table.

use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::status::StatusEnum;

/// Value reported for a field the payload omits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// `""`
    EmptyString,
    /// `[]`
    EmptyList,
    /// `null`
    Null,
}

impl FieldDefault {
    fn value(self) -> Value {
        match self {
            Self::EmptyString => Value::String(String::new()),
            Self::EmptyList => Value::Array(Vec::new()),
            Self::Null => Value::Null,
        }
    }
}

/// How a field is read from a wire record.
#[derive(Clone, Copy)]
pub enum Accessor {
    /// A single JSON path.
    Path(&'static [&'static str], FieldDefault),
    /// The first of several JSON paths that is present.
    FirstOf(&'static [&'static [&'static str]], FieldDefault),
    /// Derived from the whole record.
    Computed(fn(&Value) -> Value),
}

/// One entry of a kind's field registration table.
#[derive(Clone, Copy)]
pub struct Field {
    /// Logical column name.
    pub name: &'static str,
    /// How to read it.
    pub accessor: Accessor,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Field {
    /// A string field at `path`.
    #[must_use]
    pub const fn path(name: &'static str, path: &'static [&'static str]) -> Self {
        Self {
            name,
            accessor: Accessor::Path(path, FieldDefault::EmptyString),
        }
    }

    /// A list field at `path`.
    #[must_use]
    pub const fn list(name: &'static str, path: &'static [&'static str]) -> Self {
        Self {
            name,
            accessor: Accessor::Path(path, FieldDefault::EmptyList),
        }
    }

    /// An object or scalar field at `path` that reads as `null` when absent.
    #[must_use]
    pub const fn nullable(name: &'static str, path: &'static [&'static str]) -> Self {
        Self {
            name,
            accessor: Accessor::Path(path, FieldDefault::Null),
        }
    }

    /// A string field read from the first present path.
    #[must_use]
    pub const fn first_of(name: &'static str, paths: &'static [&'static [&'static str]]) -> Self {
        Self {
            name,
            accessor: Accessor::FirstOf(paths, FieldDefault::EmptyString),
        }
    }

    /// A derived field.
    #[must_use]
    pub const fn computed(name: &'static str, derive: fn(&Value) -> Value) -> Self {
        Self {
            name,
            accessor: Accessor::Computed(derive),
        }
    }

    /// Reads this field from a record.
    #[must_use]
    pub fn extract(&self, record: &Value) -> Value {
        match self.accessor {
            Accessor::Path(path, default) => {
                lookup(record, path).cloned().unwrap_or_else(|| default.value())
            }
            Accessor::FirstOf(paths, default) => paths
                .iter()
                .find_map(|path| lookup(record, path))
                .cloned()
                .unwrap_or_else(|| default.value()),
            Accessor::Computed(derive) => derive(record),
        }
    }
}

/// Follows a key path through nested objects.
#[must_use]
pub fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |node, key| node.get(*key))
}

/// Static description of a resource kind.
pub trait ResourceKind: Send + Sync + 'static {
    /// Human name used in messages, e.g. `gateway`.
    const NAME: &'static str;

    /// Collection path, e.g. `/api/v1/workers`.
    const BASE_PATH: &'static str;

    /// Key of the record array under `_embedded` in list responses.
    const LIST_KEY: &'static str;

    /// Every field the kind exposes, in display order.
    const FIELDS: &'static [Field];

    /// Columns shown when none are requested.
    const DEFAULT_DISPLAY_FIELDS: &'static [&'static str];

    /// Wire field and value identifying records of this kind, for kinds that
    /// share a URL namespace with others.
    const DISCRIMINATOR: Option<(&'static str, &'static str)> = None;

    /// Looks up a field by column name.
    fn field(name: &str) -> Option<&'static Field> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }

    /// Returns false for records that belong to a different kind.
    fn matches(record: &Value) -> bool {
        Self::DISCRIMINATOR.is_none_or(|(key, expected)| {
            record.get(key).and_then(Value::as_str) == Some(expected)
        })
    }
}

/// A kind whose records report a state.
pub trait StatefulKind: ResourceKind {
    /// States the remote may report.
    type Status: StatusEnum;

    /// Key path of the state in a record, e.g. `["status"]`.
    const STATUS_PATH: &'static [&'static str];
}

/// One remote entity, immutable once built.
pub struct Resource<K: ResourceKind> {
    id: String,
    raw: Value,
    kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Resource<K> {
    /// Wraps a wire record. The id is its `_links.self.href`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the record has no self link.
    pub fn from_json(raw: Value) -> Result<Self> {
        let id = lookup(&raw, &["_links", "self", "href"])
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApiError::protocol(format!("{} record has no _links.self.href", K::NAME))
            })?
            .to_string();

        Ok(Self {
            id,
            raw,
            kind: PhantomData,
        })
    }

    /// Canonical id, e.g. `/api/v2/k8scluster/20`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The decoded payload.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.raw
    }

    /// Consumes the resource, returning its payload.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.raw
    }

    /// Reads a registered field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for names outside the kind's fields.
    pub fn field(&self, name: &str) -> Result<Value> {
        K::field(name)
            .map(|field| field.extract(&self.raw))
            .ok_or_else(|| ApiError::validation(format!("Unknown column '{name}'.")))
    }

    /// Reads a string at a raw payload path.
    #[must_use]
    pub fn str_at(&self, path: &[&str]) -> Option<&str> {
        lookup(&self.raw, path).and_then(Value::as_str)
    }
}

impl<K: StatefulKind> Resource<K> {
    /// State name as reported, if any.
    #[must_use]
    pub fn status_name(&self) -> Option<&str> {
        self.str_at(K::STATUS_PATH)
    }

    /// Reported state.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the state is missing or not a
    /// member of the kind's status set.
    pub fn status(&self) -> Result<K::Status> {
        let name = self.status_name().ok_or_else(|| {
            ApiError::protocol(format!(
                "{} {} has no {}",
                K::NAME,
                self.id,
                K::STATUS_PATH.join(".")
            ))
        })?;
        K::Status::from_name(name).map_err(|e| ApiError::protocol(e.to_string()))
    }
}

impl<K: ResourceKind> Clone for Resource<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            raw: self.raw.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> fmt::Debug for Resource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<K: ResourceKind> PartialEq for Resource<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K: ResourceKind> Eq for Resource<K> {}

impl<K: ResourceKind> Serialize for Resource<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

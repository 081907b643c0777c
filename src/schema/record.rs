//! The [`Record`] trait and typed access to row values.

use rusqlite::types::Value;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::field::FieldSpec;
use crate::{Error, Result};

/// A type persisted through [`Objects`](super::Objects).
pub trait Record: Sized {
    /// Backing table name.
    fn table_name() -> &'static str;

    /// Declared fields in declaration order.
    fn schema() -> Vec<FieldSpec>;

    /// One value per declared field, in the same order as [`Record::schema`] (skipped fields included).
    fn to_values(&self) -> Vec<Value>;

    /// Rebuild from values keyed by field name.
    fn from_values(values: FieldValues) -> Result<Self>;
}

/// Row values keyed by field name, with typed getters.
#[derive(Debug, Default)]
pub struct FieldValues {
    values: HashMap<&'static str, Value>,
}

impl FieldValues {
    pub fn insert(&mut self, field: &'static str, value: Value) {
        self.values.insert(field, value);
    }

    fn take(&mut self, field: &str) -> Value {
        self.values.remove(field).unwrap_or(Value::Null)
    }

    pub fn int(&mut self, field: &str) -> Result<i64> {
        match self.take(field) {
            Value::Integer(v) => Ok(v),
            other => Err(mismatch(field, "INTEGER", &other)),
        }
    }

    pub fn uint(&mut self, field: &str) -> Result<u64> {
        self.int(field).map(|v| v as u64)
    }

    pub fn float(&mut self, field: &str) -> Result<f64> {
        match self.take(field) {
            Value::Real(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            other => Err(mismatch(field, "FLOAT", &other)),
        }
    }

    pub fn bool(&mut self, field: &str) -> Result<bool> {
        self.int(field).map(|v| v != 0)
    }

    pub fn text(&mut self, field: &str) -> Result<String> {
        match self.take(field) {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(field, "TEXT", &other)),
        }
    }

    /// NULL maps to `None`.
    pub fn opt_text(&mut self, field: &str) -> Result<Option<String>> {
        match self.take(field) {
            Value::Null => Ok(None),
            Value::Text(v) => Ok(Some(v)),
            other => Err(mismatch(field, "TEXT", &other)),
        }
    }

    pub fn blob(&mut self, field: &str) -> Result<Vec<u8>> {
        match self.take(field) {
            Value::Blob(v) => Ok(v),
            other => Err(mismatch(field, "BLOB", &other)),
        }
    }

    /// Timestamps are stored as nanoseconds since the Unix epoch.
    pub fn timestamp(&mut self, field: &str) -> Result<SystemTime> {
        let ns = self.int(field)?;
        Ok(UNIX_EPOCH + Duration::from_nanos(ns.max(0) as u64))
    }
}

fn mismatch(field: &str, expected: &str, got: &Value) -> Error {
    Error::unsupported_type(format!(
        "field {field:?}: expected {expected}, got {:?}",
        got.data_type()
    ))
}

/// Encode a timestamp the way [`FieldValues::timestamp`] reads it back.
pub fn timestamp_value(t: SystemTime) -> Value {
    let ns = t
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0);
    Value::Integer(ns)
}

/// `Some(text)` → TEXT, `None` → NULL.
pub fn opt_text_value(v: Option<&str>) -> Value {
    v.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

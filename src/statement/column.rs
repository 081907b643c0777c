//! Column descriptors and the supported declared SQL types.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::quote::quote_identifier;
use crate::error::Error;

/// Declared column type. The set is fixed; order matters when an annotation names several.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclType {
    Text,
    Blob,
    Datetime,
    Timestamp,
    Float,
    Integer,
    Bool,
}

impl DeclType {
    /// Supported types in preference order.
    pub const ALL: [DeclType; 7] = [
        DeclType::Text,
        DeclType::Blob,
        DeclType::Datetime,
        DeclType::Timestamp,
        DeclType::Float,
        DeclType::Integer,
        DeclType::Bool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclType::Text => "TEXT",
            DeclType::Blob => "BLOB",
            DeclType::Datetime => "DATETIME",
            DeclType::Timestamp => "TIMESTAMP",
            DeclType::Float => "FLOAT",
            DeclType::Integer => "INTEGER",
            DeclType::Bool => "BOOL",
        }
    }
}

impl fmt::Display for DeclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        DeclType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| Error::unsupported_type(format!("declared type {s:?}")))
    }
}

/// One table column: name, declared type, flags and ordinal of the field it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub decl_type: DeclType,
    pub nullable: bool,
    pub primary: bool,
    /// Declaration index of the originating field (`None` for columns read back from a table).
    pub index: Option<usize>,
}

impl Column {
    pub fn new(name: impl Into<String>, decl_type: DeclType) -> Self {
        Self {
            name: name.into(),
            decl_type,
            nullable: false,
            primary: false,
            index: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Column definition as used inside CREATE TABLE.
    pub fn query(&self) -> String {
        if self.nullable {
            format!("{} {}", quote_identifier(&self.name), self.decl_type)
        } else {
            format!("{} {} NOT NULL", quote_identifier(&self.name), self.decl_type)
        }
    }
}

//! Field descriptions: what a record declares about each of its fields.

use std::time::SystemTime;

use crate::statement::DeclType;

/// Value kind of a declared field, derived from its Rust type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Blob,
    Timestamp,
    /// A type with no SQL mapping; carries the type name for error messages.
    Other(&'static str),
}

impl ValueKind {
    /// Declared SQL type inferred for this kind, if any.
    pub fn decl_type(&self) -> Option<DeclType> {
        match self {
            ValueKind::Bool => Some(DeclType::Bool),
            ValueKind::Int | ValueKind::UInt => Some(DeclType::Integer),
            ValueKind::Float => Some(DeclType::Float),
            ValueKind::Text => Some(DeclType::Text),
            ValueKind::Blob => Some(DeclType::Blob),
            ValueKind::Timestamp => Some(DeclType::Timestamp),
            ValueKind::Other(_) => None,
        }
    }
}

/// Rust types that can back a record field.
pub trait FieldKind {
    const KIND: ValueKind;
}

macro_rules! field_kind {
    ($kind:expr => $($t:ty),+) => {
        $(impl FieldKind for $t {
            const KIND: ValueKind = $kind;
        })+
    };
}

field_kind!(ValueKind::Int => i8, i16, i32, i64, isize);
field_kind!(ValueKind::UInt => u8, u16, u32, u64, usize);
field_kind!(ValueKind::Float => f32, f64);
field_kind!(ValueKind::Bool => bool);
field_kind!(ValueKind::Text => String, &str);
field_kind!(ValueKind::Blob => Vec<u8>);
field_kind!(ValueKind::Timestamp => SystemTime);

impl<T: FieldKind> FieldKind for Option<T> {
    const KIND: ValueKind = T::KIND;
}

/// One declared field plus its column overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: &'static str,
    pub kind: ValueKind,
    pub column: Option<String>,
    pub nullable: bool,
    pub primary: bool,
    pub decl_type: Option<DeclType>,
    pub skip: bool,
}

impl FieldSpec {
    pub fn new(field: &'static str, kind: ValueKind) -> Self {
        Self {
            field,
            kind,
            column: None,
            nullable: false,
            primary: false,
            decl_type: None,
            skip: false,
        }
    }

    /// Field whose kind is inferred from `T`.
    pub fn of<T: FieldKind>(field: &'static str) -> Self {
        Self::new(field, T::KIND)
    }

    pub fn rename(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn decl_type(mut self, decl_type: DeclType) -> Self {
        self.decl_type = Some(decl_type);
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Apply an annotation of the form `name,option,...`.
    ///
    /// `-` skips the field. An empty name keeps the field name. Options are case-insensitive:
    /// `nullable`, `primary`, or a supported type; the first type in [`DeclType::ALL`] order wins.
    pub fn tag(mut self, tag: &str) -> Self {
        if tag == "-" {
            return self.skip();
        }
        let (name, options) = tag.split_once(',').unwrap_or((tag, ""));
        if !name.is_empty() {
            self.column = Some(name.to_string());
        }
        if has_option(options, "NULLABLE") {
            self.nullable = true;
        }
        if has_option(options, "PRIMARY") {
            self.primary = true;
        }
        if let Some(t) = DeclType::ALL
            .into_iter()
            .find(|t| has_option(options, t.as_str()))
        {
            self.decl_type = Some(t);
        }
        self
    }

    /// Column name: the override if set, else the field name.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(self.field)
    }
}

fn has_option(options: &str, option: &str) -> bool {
    options
        .split(',')
        .any(|o| o.trim().eq_ignore_ascii_case(option))
}

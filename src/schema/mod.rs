//! Object-to-table mapping: record types declare their fields, the mapper derives columns,
//! resolves the backing table and writes records through cached statements.

pub mod field;
pub mod handle;
pub mod objects;
pub mod record;

pub use field::{FieldKind, FieldSpec, ValueKind};
pub use handle::{TableHandle, derive_columns};
pub use objects::{Objects, WriteMode};
pub use record::{FieldValues, Record, opt_text_value, timestamp_value};

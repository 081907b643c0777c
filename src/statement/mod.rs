//! SQL statement text generation: column descriptors in, statement text out.

pub mod builder;
pub mod column;
pub mod quote;

pub use builder::{CreateTable, Delete, DropTable, Insert, Select, Source, TableName};
pub use column::{Column, DeclType};
pub use quote::{double_quote, is_reserved_word, quote_identifier, quote_identifiers};

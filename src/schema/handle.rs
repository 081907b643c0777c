//! Table handles: a record type bound to its table, with statement text built once.

use rusqlite::types::Value;
use std::collections::HashSet;

use super::field::FieldSpec;
use super::record::FieldValues;
use crate::statement::{Column, CreateTable, Delete, Insert, Select, Source, TableName};
use crate::{Error, Result};

/// Derive one column per non-skipped field, in declaration order.
/// Each column's `index` is the declaration index of its field.
pub fn derive_columns(fields: &[FieldSpec]) -> Result<Vec<Column>> {
    let mut columns = Vec::with_capacity(fields.len());
    let mut seen = HashSet::new();
    for (i, field) in fields.iter().enumerate() {
        if field.skip {
            continue;
        }
        let decl_type = match (field.decl_type, field.kind.decl_type()) {
            (Some(t), _) | (None, Some(t)) => t,
            (None, None) => {
                return Err(Error::unsupported_type(format!(
                    "field {:?} has no SQL mapping ({:?})",
                    field.field, field.kind
                )));
            }
        };
        let name = field.column_name().to_string();
        if !seen.insert(name.clone()) {
            return Err(Error::bad_parameter(format!("duplicate column {name:?}")));
        }
        let mut column = Column::new(name, decl_type).with_index(i);
        column.nullable = field.nullable;
        column.primary = field.primary;
        columns.push(column);
    }
    if columns.is_empty() {
        return Err(Error::unsupported_type("record has no usable columns"));
    }
    Ok(columns)
}

/// A registered table: name, ordered columns and cached INSERT / upsert / DELETE text.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table: TableName,
    columns: Vec<Column>,
    /// Field name backing each column, same order as `columns`.
    fields: Vec<&'static str>,
    insert_sql: String,
    upsert_sql: String,
    /// None when the table has no primary key.
    delete_sql: Option<String>,
}

impl TableHandle {
    pub(crate) fn new(table: &str, fields: &[FieldSpec]) -> Result<Self> {
        let columns = derive_columns(fields)?;
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let primary: Vec<&str> = columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| c.name.as_str())
            .collect();

        let insert_sql = Insert::new(table, &names).query();
        let upsert_sql = if primary.is_empty() {
            insert_sql.clone()
        } else {
            Insert::new(table, &names).on_conflict_update(&primary).query()
        };
        let delete_sql = (!primary.is_empty()).then(|| Delete::new(table, &primary).query());
        let column_fields = columns
            .iter()
            .filter_map(|c| c.index.map(|i| fields[i].field))
            .collect();

        Ok(Self {
            table: TableName::new(table),
            columns,
            fields: column_fields,
            insert_sql,
            upsert_sql,
            delete_sql,
        })
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    pub fn upsert_sql(&self) -> &str {
        &self.upsert_sql
    }

    /// `DELETE ... WHERE` over the primary key columns, if there are any.
    pub fn delete_sql(&self) -> Option<&str> {
        self.delete_sql.as_deref()
    }

    /// `CREATE TABLE IF NOT EXISTS` for this handle's columns.
    pub fn create_sql(&self) -> String {
        CreateTable::new(self.table.name(), &self.columns)
            .if_not_exists()
            .query()
    }

    pub fn count_sql(&self) -> String {
        Select::new(Some(Source::new(self.table.name()))).count().query()
    }

    pub fn select_sql(&self, limit: u64) -> String {
        Select::new(Some(Source::new(self.table.name())))
            .limit_offset(limit, 0)
            .query()
    }

    /// Pick the bound arguments out of a record's per-field values, in column order.
    pub fn bind(&self, mut values: Vec<Value>) -> Result<Vec<Value>> {
        self.columns
            .iter()
            .map(|c| {
                c.index
                    .and_then(|i| values.get_mut(i))
                    .map(|v| std::mem::replace(v, Value::Null))
                    .ok_or_else(|| {
                        Error::bad_parameter(format!(
                            "{}: no value for column {:?}",
                            self.table.name(),
                            c.name
                        ))
                    })
            })
            .collect()
    }

    /// Primary key arguments of a record, in column order.
    pub fn bind_key(&self, values: Vec<Value>) -> Result<Vec<Value>> {
        let args = self.bind(values)?;
        Ok(self
            .columns
            .iter()
            .zip(args)
            .filter(|(c, _)| c.primary)
            .map(|(_, v)| v)
            .collect())
    }

    /// Map a result row back to field values by column name. Unknown columns are ignored.
    pub fn field_values(&self, columns: &[String], row: Vec<Value>) -> FieldValues {
        let mut out = FieldValues::default();
        for (name, value) in columns.iter().zip(row) {
            if let Some(pos) = self.columns.iter().position(|c| &c.name == name) {
                out.insert(self.fields[pos], value);
            }
        }
        out
    }
}

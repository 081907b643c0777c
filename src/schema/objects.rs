//! [`Objects`]: registered record types over one [`Store`].

use log::debug;
use std::collections::HashMap;

use super::field::FieldSpec;
use super::handle::TableHandle;
use super::record::Record;
use crate::engine::db_ops::{Store, execute_on};
use crate::statement::DropTable;
use crate::{Error, Result};

/// How [`Objects::write`] treats rows whose primary key already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Plain INSERT; a duplicate key is a storage error.
    Insert,
    /// INSERT ... ON CONFLICT DO UPDATE.
    Upsert,
}

/// Maps record types onto tables of one store.
pub struct Objects {
    store: Store,
    create: bool,
    classes: HashMap<String, TableHandle>,
}

impl Objects {
    /// `create`: whether registration may create missing tables.
    pub fn new(store: Store, create: bool) -> Self {
        Self {
            store,
            create,
            classes: HashMap::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Register `R` under [`Record::table_name`].
    pub fn register<R: Record>(&mut self) -> Result<TableHandle> {
        self.register_type(R::table_name(), &R::schema())
    }

    /// Resolve (or create) the table for `fields` and remember the handle.
    pub fn register_type(&mut self, table: &str, fields: &[FieldSpec]) -> Result<TableHandle> {
        let table = table.trim();
        if table.is_empty() {
            return Err(Error::bad_parameter("empty table name"));
        }
        if self.classes.contains_key(table) {
            return Err(Error::bad_parameter(format!(
                "table {table:?} is already registered"
            )));
        }
        let handle = TableHandle::new(table, fields)?;

        if self.store.tables()?.iter().any(|t| t == table) {
            self.verify_columns(&handle)?;
        } else if self.create {
            let sql = handle.create_sql();
            debug!("create: {sql}");
            self.store.execute(&sql, &[])?;
        } else {
            return Err(Error::not_found(format!("table {table:?}")));
        }

        self.classes.insert(table.to_string(), handle.clone());
        Ok(handle)
    }

    /// Every mapped column must exist in the table with the same declared type.
    fn verify_columns(&self, handle: &TableHandle) -> Result<()> {
        let existing = self.store.columns_for_table(handle.name())?;
        for column in handle.columns() {
            match existing.iter().find(|c| c.name == column.name) {
                Some(c) if c.decl_type == column.decl_type => {}
                Some(c) => {
                    return Err(Error::unsupported_type(format!(
                        "{}.{}: declared {}, table has {}",
                        handle.name(),
                        column.name,
                        column.decl_type,
                        c.decl_type
                    )));
                }
                None => {
                    return Err(Error::unsupported_type(format!(
                        "{}: missing column {:?}",
                        handle.name(),
                        column.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn handle<R: Record>(&self) -> Result<&TableHandle> {
        self.classes
            .get(R::table_name())
            .ok_or_else(|| Error::not_found(format!("type for table {:?}", R::table_name())))
    }

    /// Write `records` in one transaction. Returns the number of affected rows.
    pub fn write<R: Record>(&mut self, mode: WriteMode, records: &[R]) -> Result<u64> {
        if records.is_empty() {
            return Err(Error::bad_parameter("no records to write"));
        }
        let handle = self
            .classes
            .get(R::table_name())
            .ok_or_else(|| Error::not_found(format!("type for table {:?}", R::table_name())))?;
        let sql = match mode {
            WriteMode::Insert => handle.insert_sql(),
            WriteMode::Upsert => handle.upsert_sql(),
        };
        self.store.run_in_transaction(|conn| {
            let mut affected = 0;
            for record in records {
                let args = handle.bind(record.to_values())?;
                affected += execute_on(conn, sql, &args)?.rows_affected;
            }
            Ok(affected)
        })
    }

    /// Delete `records` by primary key in one transaction. Returns the number of deleted rows.
    /// A type without a primary key is UnsupportedType.
    pub fn delete<R: Record>(&mut self, records: &[R]) -> Result<u64> {
        if records.is_empty() {
            return Err(Error::bad_parameter("no records to delete"));
        }
        let handle = self
            .classes
            .get(R::table_name())
            .ok_or_else(|| Error::not_found(format!("type for table {:?}", R::table_name())))?;
        let Some(sql) = handle.delete_sql() else {
            return Err(Error::unsupported_type(format!(
                "table {:?} has no primary key",
                handle.name()
            )));
        };
        self.store.run_in_transaction(|conn| {
            let mut affected = 0;
            for record in records {
                let args = handle.bind_key(record.to_values())?;
                affected += execute_on(conn, sql, &args)?.rows_affected;
            }
            Ok(affected)
        })
    }

    pub fn count<R: Record>(&self) -> Result<u64> {
        let handle = self.handle::<R>()?;
        let rows = self.store.query(&handle.count_sql(), &[])?;
        match rows.rows.first().and_then(|r| r.first()) {
            Some(rusqlite::types::Value::Integer(n)) => Ok(*n as u64),
            _ => Ok(0),
        }
    }

    /// Up to `limit` records in table order. A limit of 0 reads every row.
    pub fn read<R: Record>(&self, limit: u64) -> Result<Vec<R>> {
        let handle = self.handle::<R>()?;
        let rows = self.store.query(&handle.select_sql(limit), &[])?;
        rows.rows
            .into_iter()
            .map(|row| R::from_values(handle.field_values(&rows.columns, row)))
            .collect()
    }

    /// Drop the table backing `R` (if present) and forget its handle.
    pub fn drop_table<R: Record>(&mut self) -> Result<()> {
        let sql = DropTable::new(R::table_name()).if_exists().query();
        self.store.execute(&sql, &[])?;
        self.classes.remove(R::table_name());
        Ok(())
    }
}

//! Thin statement-execution layer over a SQLite connection.

use log::debug;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::path::Path;

use super::connection::{open_db, open_db_in_memory};
use crate::Result;
use crate::statement::{Column, DeclType};

/// Outcome of a statement that returns no rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub last_insert_id: i64,
    pub rows_affected: u64,
}

/// Materialised result set: column names plus owned row values.
#[derive(Clone, Debug, Default)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    /// Position of a named column in each row.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Owns one connection. Statements are passed as text with positional bound arguments.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Execute a statement that returns no rows.
    pub fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        execute_on(&self.conn, sql, args)
    }

    /// Run a query and collect every row.
    pub fn query(&self, sql: &str, args: &[Value]) -> Result<Rows> {
        debug!("query: {sql}");
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let n = columns.len();
        let mut cursor = stmt.query(params_from_iter(args.iter()))?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(n);
            for i in 0..n {
                values.push(row.get::<_, Value>(i)?);
            }
            rows.push(values);
        }
        Ok(Rows { columns, rows })
    }

    /// Names of user tables in the main schema.
    pub fn tables(&self) -> Result<Vec<String>> {
        let rows = self.query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            &[],
        )?;
        Ok(rows
            .rows
            .into_iter()
            .filter_map(|mut r| match r.pop() {
                Some(Value::Text(name)) => Some(name),
                _ => None,
            })
            .collect())
    }

    /// Columns of an existing table as declared, in table order.
    /// Declared types outside the supported set are skipped.
    pub fn columns_for_table(&self, table: &str) -> Result<Vec<Column>> {
        let mut stmt = self.conn.prepare("SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1)")?;
        let rows = stmt.query_map([table], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;
        let mut columns = Vec::new();
        for row in rows {
            let (name, decl, not_null, pk) = row?;
            let Ok(decl_type) = decl.parse::<DeclType>() else {
                debug!("{table}.{name}: unsupported declared type {decl:?}");
                continue;
            };
            columns.push(Column {
                name,
                decl_type,
                nullable: not_null == 0,
                primary: pk > 0,
                index: None,
            });
        }
        Ok(columns)
    }

    /// Run `f` inside a transaction; commit on Ok, roll back on Err.
    pub fn run_in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let tx = self.conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// Execute on any connection (plain or inside a transaction).
pub fn execute_on(conn: &Connection, sql: &str, args: &[Value]) -> Result<ExecResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows_affected = stmt.execute(params_from_iter(args.iter()))?;
    Ok(ExecResult {
        last_insert_id: conn.last_insert_rowid(),
        rows_affected: rows_affected as u64,
    })
}

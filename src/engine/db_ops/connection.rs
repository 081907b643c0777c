//! Open the index database.

use rusqlite::Connection;
use std::path::Path;

use super::WAL_PRAGMAS;
use crate::Result;
use crate::utils::config::BUSY_TIMEOUT;

/// Enable WAL and tuning pragmas on an open connection (idempotent).
fn apply_wal(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
    conn.execute_batch(WAL_PRAGMAS)?;
    Ok(())
}

/// Open or create the index DB in WAL mode. Safe to call more than once for the same file:
/// the writer and the read path each hold their own connection.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_wal(&conn)?;
    Ok(conn)
}

/// Open an in-memory DB (tests and scratch use; not shareable between connections).
pub fn open_db_in_memory() -> Result<Connection> {
    Ok(Connection::open_in_memory()?)
}

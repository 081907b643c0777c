//! Database operations: connection setup and the [`Store`] used by the mapper.

mod connection;
mod store;

pub use connection::{open_db, open_db_in_memory};
pub use store::{ExecResult, Rows, Store, execute_on};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

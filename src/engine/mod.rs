//! Engine module: storage, CLI plumbing and path helpers

pub mod arg_parser;
pub mod db_ops;
pub mod handlers;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands};
pub use db_ops::{ExecResult, Rows, Store, open_db, open_db_in_memory};
pub use handlers::handle_run;
pub use tools::{clean_path, path_relative_to, running_as_root};

pub mod config;
pub mod env;
pub mod fsindexer_toml;
pub mod logger;

pub use config::*;
pub use env::db_path_from_env;
pub use fsindexer_toml::{FsindexerToml, apply_file_to_opts, load_fsindexer_toml};
pub use logger::setup_logging;

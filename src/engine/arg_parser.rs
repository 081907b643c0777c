use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

struct DefaultArgs;

impl DefaultArgs {
    pub const ROOT: &'static str = ".";
}

/// Concurrent filesystem indexer: walks directories and records file metadata in SQLite.
#[derive(Clone, Parser)]
#[command(name = "fsindexer")]
#[command(about = "Index directory trees into a SQLite database and query the result.")]
pub struct Cli {
    /// Indexer root. Job paths are resolved against it. Default: current directory.
    #[arg(long, short, value_name = "DIR", default_value = DefaultArgs::ROOT, global = true)]
    pub root: PathBuf,

    /// Path to the index database. Default: `.fsindexer.db` in the root (or FSINDEXER_DB).
    #[arg(long, short, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool), global = true)]
    pub verbose: Option<bool>,

    /// Follow symbolic links while walking.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool), global = true)]
    pub follow_links: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Index one or more directories under the root and wait until they are done (Ctrl+C stops early).
    Index {
        /// Directories to index, relative to the root.
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Walker → writer queue depth (0 = each file waits for the writer).
        #[arg(long, short = 'q')]
        queue_depth: Option<usize>,
    },
    /// Print the number of indexed files.
    Count,
    /// Print indexed files.
    Query {
        /// Maximum number of rows.
        #[arg(long, short = 'n')]
        limit: Option<u64>,

        /// One JSON object per line instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Drop the file table.
    Drop,
}

impl Cli {
    /// Database path given on the command line, if any.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.db.clone()
    }

    /// Default database location for this root.
    pub fn default_db_path(&self) -> PathBuf {
        self.root.join(PackagePaths::get().db_filename())
    }
}

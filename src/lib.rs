//! fsindexer: concurrent filesystem indexer backed by SQLite.
//!
//! One walker thread per job feeds a single writer thread through a bounded channel; the writer
//! sniffs each file's MIME type and upserts a [`FileRecord`] through the [`schema`] mapper.
//!
//! ```no_run
//! use fsindexer::{Indexer, IndexerOpts, JobStatus};
//!
//! let idx = Indexer::open(IndexerOpts { root: "/data".into(), ..Default::default() })?;
//! let job = idx.add_index("docs", false)?;
//! while idx.index_by_id(job)?.map(|j| j.status) != Some(JobStatus::Idle) {
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! println!("{} files", idx.count()?);
//! idx.close()?;
//! # Ok::<(), fsindexer::Error>(())
//! ```

pub mod engine;
pub mod error;
pub mod indexer;
pub mod mime;
pub mod pipeline;
pub mod schema;
pub mod statement;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use indexer::Indexer;
/// Re-export types for API
pub use types::*;

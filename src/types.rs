//! Public and internal types for the indexer API and pipeline.

use rusqlite::types::Value;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::schema::{FieldSpec, FieldValues, Record, opt_text_value};
use crate::utils::config::{DEFAULT_QUEUE_DEPTH, DEFAULT_REPORT_INTERVAL};

/// Identity of a job: device and inode of its root directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JobId {
    pub dev: u64,
    pub ino: u64,
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dev, self.ino)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Walk finished (successfully or not).
    Idle,
    Indexing,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStatus::Idle => "idle",
            JobStatus::Indexing => "indexing",
        })
    }
}

/// Point-in-time view of one job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    pub id: JobId,
    /// Job root relative to the indexer root.
    pub name: String,
    /// Files persisted so far.
    pub count: u64,
    pub status: JobStatus,
}

/// One file found by a walker, waiting to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub job: JobId,
    pub inode: u64,
    /// Path relative to the job root.
    pub relpath: String,
    pub size: u64,
}

/// What walkers send to the dispatcher. `Finished` follows the job's last task on the same channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkItem {
    Index(Task),
    Finished(JobId),
}

/// Persisted row of the `file` table. Primary key is `(inode, root)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub inode: u64,
    /// Job root relative to the indexer root.
    pub root: String,
    /// Inode of the job root.
    pub job: u64,
    /// Path relative to the job root.
    pub relpath: String,
    pub name: String,
    /// Extension including the leading dot; `None` when the name has none.
    pub ext: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
}

impl Record for FileRecord {
    fn table_name() -> &'static str {
        "file"
    }

    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::of::<u64>("inode").primary(),
            FieldSpec::of::<String>("root").primary(),
            FieldSpec::of::<u64>("job"),
            FieldSpec::of::<String>("relpath"),
            FieldSpec::of::<String>("name"),
            FieldSpec::of::<Option<String>>("ext").nullable(),
            FieldSpec::of::<u64>("size"),
            FieldSpec::of::<Option<String>>("mime_type").tag("mimetype,nullable"),
        ]
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.inode as i64),
            Value::Text(self.root.clone()),
            Value::Integer(self.job as i64),
            Value::Text(self.relpath.clone()),
            Value::Text(self.name.clone()),
            opt_text_value(self.ext.as_deref()),
            Value::Integer(self.size as i64),
            opt_text_value(self.mime_type.as_deref()),
        ]
    }

    fn from_values(mut v: FieldValues) -> Result<Self> {
        Ok(Self {
            inode: v.uint("inode")?,
            root: v.text("root")?,
            job: v.uint("job")?,
            relpath: v.text("relpath")?,
            name: v.text("name")?,
            ext: v.opt_text("ext")?,
            size: v.uint("size")?,
            mime_type: v.opt_text("mime_type")?,
        })
    }
}

/// Aggregate progress over all jobs, as computed by the reporter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportState {
    /// Files persisted across all jobs.
    pub count: u64,
    pub jobs: usize,
    /// Jobs whose walk has finished.
    pub done: usize,
}

impl ReportState {
    pub fn finished(&self) -> bool {
        self.done == self.jobs
    }
}

impl fmt::Display for ReportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.finished() { "finished" } else { "running" };
        write!(f, "{} items indexed, {}", self.count, state)
    }
}

/// Called by the reporter whenever the indexed count changes.
pub type ProgressCallback = Arc<dyn Fn(&ReportState) + Send + Sync>;

/// Options for [`Indexer::open`](crate::Indexer::open).
#[derive(Clone)]
pub struct IndexerOpts {
    /// Directory all job paths are resolved against.
    pub root: PathBuf,
    /// Index database. When None, `<root>/.fsindexer.db`.
    pub db_path: Option<PathBuf>,
    /// Create the `file` table when missing; when false a missing table is NotFound.
    pub create_tables: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Walker → dispatcher channel capacity. 0 makes every send wait for the dispatcher.
    pub queue_depth: usize,
    pub report_interval: Duration,
    pub on_progress: Option<ProgressCallback>,
}

impl Default for IndexerOpts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            db_path: None,
            create_tables: true,
            follow_links: false,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            report_interval: DEFAULT_REPORT_INTERVAL,
            on_progress: None,
        }
    }
}

impl fmt::Debug for IndexerOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexerOpts")
            .field("root", &self.root)
            .field("db_path", &self.db_path)
            .field("create_tables", &self.create_tables)
            .field("follow_links", &self.follow_links)
            .field("queue_depth", &self.queue_depth)
            .field("report_interval", &self.report_interval)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

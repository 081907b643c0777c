//! The [`Indexer`]: job registration, status and queries over the running pipeline.

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::engine::db_ops::Store;
use crate::engine::tools::{
    clean_path, db_side_files, file_identity, path_relative_to, path_to_db_string,
};
use crate::pipeline::{
    Dispatcher, RegistryHandle, WalkContext, create_pipeline_channels, spawn_dispatcher,
    spawn_registry, spawn_reporter, spawn_walker,
};
use crate::schema::Objects;
use crate::utils::config::PackagePaths;
use crate::{Error, FileRecord, IndexerOpts, JobId, JobSnapshot, JobStatus, Result, WorkItem};

/// Everything that exists only while the pipeline is up.
struct Running {
    registry: RegistryHandle,
    work_tx: Sender<WorkItem>,
    delete_tx: Sender<JobId>,
    control_tx: Sender<()>,
    reporter_stop_tx: Sender<()>,
    walkers: Mutex<Vec<JoinHandle<()>>>,
    dispatcher: JoinHandle<()>,
    reporter: JoinHandle<()>,
    registry_thread: JoinHandle<()>,
}

/// Concurrent filesystem indexer over one root directory and one SQLite database.
///
/// [`add_index`](Self::add_index) returns as soon as the job is registered; poll
/// [`indexes`](Self::indexes) or [`index_by_id`](Self::index_by_id) until the job is
/// [`JobStatus::Idle`]. Dropping the indexer shuts it down.
pub struct Indexer {
    root: PathBuf,
    db_path: PathBuf,
    follow_links: bool,
    exclude: Arc<Vec<PathBuf>>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    /// Read side: its own connection to the same WAL database.
    reader: Mutex<Objects>,
    running: Option<Running>,
}

fn join_logged(name: &str, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("{name} thread panicked");
    }
}

impl Indexer {
    /// Open (or create) the database and start the registry, dispatcher and reporter threads.
    pub fn open(opts: IndexerOpts) -> Result<Self> {
        let root = opts.root.canonicalize().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::bad_parameter(format!("root {} does not exist", opts.root.display()))
            }
            _ => Error::Io(e),
        })?;
        if !root.is_dir() {
            return Err(Error::bad_parameter(format!(
                "root {} is not a directory",
                root.display()
            )));
        }
        let db_path = opts
            .db_path
            .clone()
            .unwrap_or_else(|| root.join(PackagePaths::get().db_filename()));
        debug!("open: root={} db={}", root.display(), db_path.display());

        let mut writer = Objects::new(Store::open(&db_path)?, opts.create_tables);
        writer.register::<FileRecord>()?;
        let mut reader = Objects::new(Store::open(&db_path)?, false);
        reader.register::<FileRecord>()?;

        let db_canonical = db_path.canonicalize().unwrap_or_else(|_| db_path.clone());
        let exclude = Arc::new(db_side_files(&db_canonical));

        let channels = create_pipeline_channels(opts.queue_depth);
        let (registry, registry_thread) = spawn_registry();
        let dispatcher = spawn_dispatcher(
            Dispatcher::new(writer, registry.clone(), &root),
            channels.work_rx,
            channels.delete_rx,
            channels.control_rx,
        );
        let reporter = spawn_reporter(
            registry.clone(),
            opts.report_interval,
            opts.on_progress.clone(),
            channels.reporter_stop_rx,
        );

        Ok(Self {
            root,
            db_path,
            follow_links: opts.follow_links,
            exclude,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            reader: Mutex::new(reader),
            running: Some(Running {
                registry,
                work_tx: channels.work_tx,
                delete_tx: channels.delete_tx,
                control_tx: channels.control_tx,
                reporter_stop_tx: channels.reporter_stop_tx,
                walkers: Mutex::new(Vec::new()),
                dispatcher,
                reporter,
                registry_thread,
            }),
        })
    }

    fn running(&self) -> Result<&Running> {
        self.running.as_ref().ok_or(Error::Closed)
    }

    /// Canonical indexer root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Walker threads still running.
    pub fn active_walkers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Register `path` (relative to the root, or absolute inside it) as a job and start walking it.
    /// Returns as soon as the walker is started. `watch` is not implemented.
    pub fn add_index(&self, path: impl AsRef<Path>, watch: bool) -> Result<JobId> {
        if watch {
            return Err(Error::not_implemented("watching for changes"));
        }
        let running = self.running()?;
        let path = path.as_ref();
        let abs = clean_path(&self.root.join(path));
        let Some(rel) = path_relative_to(&abs, &self.root) else {
            return Err(Error::bad_parameter(format!(
                "{} is outside {}",
                path.display(),
                self.root.display()
            )));
        };
        let meta = std::fs::metadata(&abs).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::bad_parameter(format!("{} does not exist", abs.display()))
            }
            _ => Error::Io(e),
        })?;
        if !meta.is_dir() {
            return Err(Error::bad_parameter(format!(
                "{} is not a directory",
                abs.display()
            )));
        }
        let (dev, ino) = file_identity(&meta);
        if ino == 0 {
            return Err(Error::bad_parameter(format!(
                "{} has no inode",
                abs.display()
            )));
        }
        let id = JobId { dev, ino };
        let name = path_to_db_string(&rel);
        running.registry.add(id, name.clone())?;
        info!("indexing {name} (job {id})");

        let walker = spawn_walker(
            WalkContext {
                job: id,
                root: abs,
                follow_links: self.follow_links,
                exclude: Arc::clone(&self.exclude),
            },
            running.work_tx.clone(),
            Arc::clone(&self.shutdown),
            Arc::clone(&self.active),
        );
        running
            .walkers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(walker);
        Ok(id)
    }

    /// Unknown job → NotFound. Otherwise the request goes to the dispatcher and the call
    /// returns NotImplemented: nothing is removed yet.
    pub fn delete_index(&self, id: JobId) -> Result<()> {
        let running = self.running()?;
        if running.registry.lookup(id)?.is_none() {
            return Err(Error::not_found(format!("job {id}")));
        }
        running.delete_tx.send(id).map_err(|_| Error::Closed)?;
        Err(Error::not_implemented(format!("delete of job {id}")))
    }

    /// Unknown job → NotFound, known job → NotImplemented.
    pub fn reindex_by_id(&self, id: JobId) -> Result<()> {
        let running = self.running()?;
        if running.registry.lookup(id)?.is_none() {
            return Err(Error::not_found(format!("job {id}")));
        }
        Err(Error::not_implemented(format!("reindex of job {id}")))
    }

    /// Snapshots of every job, in registration order.
    pub fn indexes(&self) -> Result<Vec<JobSnapshot>> {
        self.running()?.registry.list()
    }

    pub fn index_by_id(&self, id: JobId) -> Result<Option<JobSnapshot>> {
        self.running()?.registry.lookup(id)
    }

    /// True when every registered job has finished walking and its tasks are persisted.
    pub fn all_idle(&self) -> Result<bool> {
        Ok(self
            .indexes()?
            .iter()
            .all(|j| j.status == JobStatus::Idle))
    }

    /// Rows in the `file` table.
    pub fn count(&self) -> Result<u64> {
        self.reader
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .count::<FileRecord>()
    }

    /// Up to `limit` records. A limit of 0 is BadParameter.
    pub fn query(&self, limit: u64) -> Result<Vec<FileRecord>> {
        if limit == 0 {
            return Err(Error::bad_parameter("limit must be greater than zero"));
        }
        self.reader
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .read::<FileRecord>(limit)
    }

    /// Stop walkers, drain and stop the dispatcher, then the reporter and the registry.
    /// Returns once every thread has exited. Calling it again is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        debug!("shutdown: stopping {} walkers", self.active_walkers());
        self.shutdown.store(true, Ordering::SeqCst);

        let Running {
            registry,
            work_tx,
            delete_tx,
            control_tx,
            reporter_stop_tx,
            walkers,
            dispatcher,
            reporter,
            registry_thread,
        } = running;

        // The dispatcher keeps receiving while walkers finish their last send.
        let walkers = walkers.into_inner().unwrap_or_else(|e| e.into_inner());
        for walker in walkers {
            join_logged("walker", walker);
        }
        drop(work_tx);
        drop(delete_tx);

        let _ = control_tx.send(());
        join_logged("dispatcher", dispatcher);
        let _ = reporter_stop_tx.send(());
        join_logged("reporter", reporter);

        drop(registry);
        join_logged("registry", registry_thread);
        debug!("shutdown complete");
        Ok(())
    }

    /// Shut down and release the database.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }
}

impl Drop for Indexer {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("shutdown: {e}");
        }
    }
}

//! The single writer: turns tasks into `file` rows and forwards completion to the registry.

use crossbeam_channel::{Receiver, select};
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use super::registry::RegistryHandle;
use crate::engine::tools::{base_name, file_ext};
use crate::mime::detect_mime_type;
use crate::schema::{Objects, WriteMode};
use crate::{Error, FileRecord, JobId, Result, Task, WorkItem};

/// Owns the write side of the store. Nothing else writes.
pub struct Dispatcher {
    objects: Objects,
    registry: RegistryHandle,
    /// Indexer root; job names are relative to it.
    root: PathBuf,
}

impl Dispatcher {
    pub fn new(objects: Objects, registry: RegistryHandle, root: &Path) -> Self {
        Self {
            objects,
            registry,
            root: root.to_path_buf(),
        }
    }

    /// Serve work and delete requests until the control channel fires (or every work sender is gone),
    /// then drain whatever is still queued.
    pub fn run(
        mut self,
        work_rx: Receiver<WorkItem>,
        delete_rx: Receiver<JobId>,
        control_rx: Receiver<()>,
    ) {
        loop {
            select! {
                recv(control_rx) -> _ => break,
                recv(work_rx) -> msg => match msg {
                    Ok(item) => self.handle_work(item),
                    Err(_) => break,
                },
                recv(delete_rx) -> msg => {
                    if let Ok(id) = msg {
                        self.handle_delete(id);
                    }
                }
            }
        }
        while let Ok(item) = work_rx.try_recv() {
            self.handle_work(item);
        }
        while let Ok(id) = delete_rx.try_recv() {
            self.handle_delete(id);
        }
        debug!("dispatcher stopped");
    }

    fn handle_work(&mut self, item: WorkItem) {
        match item {
            WorkItem::Index(task) => {
                let job = task.job;
                match self.index_file(task) {
                    Ok(true) => {
                        if self.registry.processed(job).is_err() {
                            warn!("registry closed; count for job {job} not updated");
                        }
                    }
                    Ok(false) => {}
                    Err(e) => error!("job {job}: {e}"),
                }
            }
            WorkItem::Finished(job) => {
                if self.registry.finished(job).is_err() {
                    warn!("registry closed; job {job} not marked finished");
                }
            }
        }
    }

    /// Persist one task. Ok(false) when the job is unknown.
    fn index_file(&mut self, task: Task) -> Result<bool> {
        let Some(job) = self.registry.lookup(task.job)? else {
            warn!("task for unknown job {}: {}", task.job, task.relpath);
            return Ok(false);
        };
        let abs = self.root.join(&job.name).join(&task.relpath);
        let mime_type = detect_mime_type(&abs).unwrap_or_else(|e| {
            warn!("{}: mime detection failed: {}", abs.display(), e);
            None
        });
        let rel = Path::new(&task.relpath);
        let record = FileRecord {
            inode: task.inode,
            root: job.name,
            job: task.job.ino,
            name: base_name(rel),
            ext: file_ext(rel),
            relpath: task.relpath,
            size: task.size,
            mime_type,
        };
        self.objects.write(WriteMode::Upsert, &[record])?;
        Ok(true)
    }

    fn handle_delete(&mut self, id: JobId) {
        match self.registry.lookup(id) {
            Ok(Some(job)) => warn!(
                "{}",
                Error::not_implemented(format!("delete of job {id} ({})", job.name))
            ),
            Ok(None) => warn!("delete for unknown job {id}"),
            Err(e) => warn!("delete for job {id}: {e}"),
        }
    }
}

/// Run `dispatcher` on its own thread.
pub fn spawn_dispatcher(
    dispatcher: Dispatcher,
    work_rx: Receiver<WorkItem>,
    delete_rx: Receiver<JobId>,
    control_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || dispatcher.run(work_rx, delete_rx, control_rx))
}

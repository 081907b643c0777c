//! Per-job walker: one thread per job, feeding tasks to the dispatcher.

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use walkdir::{DirEntry, WalkDir};

use crate::engine::tools::{can_enter_dir, file_identity, is_hidden, path_to_db_string};
use crate::{Error, JobId, Result, Task, WorkItem};

/// What one walker needs: where to walk and what to leave out.
#[derive(Clone, Debug)]
pub struct WalkContext {
    pub job: JobId,
    /// Absolute job root.
    pub root: PathBuf,
    pub follow_links: bool,
    /// Absolute paths never turned into tasks (the index db and its side files).
    pub exclude: Arc<Vec<PathBuf>>,
}

/// Decrements the active-walker count when the walker thread ends, however it ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Spawn the walker for one job. `active` is incremented here and decremented when the thread exits.
/// The last thing the thread sends is `WorkItem::Finished`, whether the walk succeeded or not.
pub fn spawn_walker(
    ctx: WalkContext,
    work_tx: Sender<WorkItem>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
) -> JoinHandle<()> {
    active.fetch_add(1, Ordering::SeqCst);
    let guard = ActiveGuard(active);
    thread::spawn(move || {
        let _guard = guard;
        let job = ctx.job;
        match walk_job(&ctx, &work_tx, &shutdown) {
            Ok(n) => debug!("walk {job} done: {n} tasks"),
            Err(Error::DeadlineExceeded) => info!("walk {job} stopped by shutdown"),
            Err(e) => warn!("walk {job} aborted: {e}"),
        }
        let _ = work_tx.send(WorkItem::Finished(job));
    })
}

/// Directories other than the job root are pruned when hidden or not listable/enterable.
fn keep_dir(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry.file_type().is_dir()
        || (!is_hidden(entry.file_name()) && can_enter_dir(entry.path()))
}

fn is_eperm(err: &walkdir::Error) -> bool {
    err.io_error().and_then(|e| e.raw_os_error()) == Some(libc::EPERM)
}

/// Walk the job root and send one task per eligible file. Returns the number of tasks sent.
///
/// Files are skipped when hidden, empty, or without an inode. EPERM on an entry is skipped;
/// any other error ends the walk. The shutdown flag is checked before every entry.
pub fn walk_job(ctx: &WalkContext, work_tx: &Sender<WorkItem>, shutdown: &AtomicBool) -> Result<u64> {
    let walker = WalkDir::new(&ctx.root)
        .follow_links(ctx.follow_links)
        .into_iter()
        .filter_entry(keep_dir);

    let mut sent = 0_u64;
    for entry in walker {
        if shutdown.load(Ordering::SeqCst) {
            return Err(Error::DeadlineExceeded);
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_eperm(&e) => {
                debug!("skip: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !entry.file_type().is_file() || is_hidden(entry.file_name()) {
            continue;
        }
        if ctx.exclude.iter().any(|p| p == entry.path()) {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) if is_eperm(&e) => {
                debug!("skip: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let (_, inode) = file_identity(&meta);
        if meta.len() == 0 || inode == 0 {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&ctx.root) else {
            continue;
        };
        let task = Task {
            job: ctx.job,
            inode,
            relpath: path_to_db_string(rel),
            size: meta.len(),
        };
        work_tx.send(WorkItem::Index(task)).map_err(|_| Error::Closed)?;
        sent += 1;
    }
    Ok(sent)
}

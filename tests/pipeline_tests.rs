//! Pipeline tests: walker backpressure and shutdown, reporter emission, dispatcher loop.

use crossbeam_channel::{bounded, unbounded};
use fsindexer::engine::Store;
use fsindexer::pipeline::{
    Dispatcher, WalkContext, spawn_dispatcher, spawn_registry, spawn_reporter, walk_job,
};
use fsindexer::schema::Objects;
use fsindexer::{Error, FileRecord, JobId, JobStatus, ReportState, Task, WorkItem};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, sleep};
use std::time::Duration;

fn walk_context(root: &Path) -> WalkContext {
    WalkContext {
        job: JobId { dev: 1, ino: 1 },
        root: root.to_path_buf(),
        follow_links: false,
        exclude: Arc::new(Vec::new()),
    }
}

fn task(job: JobId, inode: u64, relpath: &str) -> WorkItem {
    WorkItem::Index(Task {
        job,
        inode,
        relpath: relpath.to_string(),
        size: 3,
    })
}

/// Writer and reader `Objects` over one db file in `dir`.
fn file_objects(dir: &Path) -> (Objects, Objects) {
    let db = dir.join("test.db");
    let mut writer = Objects::new(Store::open(&db).unwrap(), true);
    writer.register::<FileRecord>().unwrap();
    let mut reader = Objects::new(Store::open(&db).unwrap(), false);
    reader.register::<FileRecord>().unwrap();
    (writer, reader)
}

// --- walker ---

#[test]
fn test_walk_blocks_on_rendezvous_and_stops_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("f{i}.txt")), b"abc").unwrap();
    }
    let ctx = walk_context(dir.path());
    let (tx, rx) = bounded::<WorkItem>(0);
    let shutdown = Arc::new(AtomicBool::new(false));
    let walker = {
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || walk_job(&ctx, &tx, &shutdown))
    };

    // Nothing is buffered and the walker waits on its first send.
    sleep(Duration::from_millis(100));
    assert_eq!(rx.len(), 0);
    assert!(!walker.is_finished());

    assert!(matches!(rx.recv().unwrap(), WorkItem::Index(_)));
    shutdown.store(true, Ordering::SeqCst);

    // At most the send already in flight gets through.
    let extra = rx.iter().count();
    assert!(extra <= 1, "received {extra} items after shutdown");
    assert!(matches!(walker.join().unwrap(), Err(Error::DeadlineExceeded)));
}

#[test]
fn test_walk_without_shutdown_sends_every_file() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("f{i}.txt")), b"abc").unwrap();
    }
    let ctx = walk_context(dir.path());
    let (tx, rx) = bounded::<WorkItem>(0);
    let shutdown = AtomicBool::new(false);
    let walker = thread::spawn(move || walk_job(&ctx, &tx, &shutdown));

    assert_eq!(rx.iter().count(), 5);
    assert_eq!(walker.join().unwrap().unwrap(), 5);
}

// --- reporter ---

#[test]
fn test_reporter_emits_only_on_count_change() {
    let (registry, registry_thread) = spawn_registry();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let cb_seen = Arc::clone(&seen);
    let (stop_tx, stop_rx) = bounded(1);
    let reporter = spawn_reporter(
        registry.clone(),
        Duration::from_millis(5),
        Some(Arc::new(move |s: &ReportState| {
            cb_seen.lock().unwrap().push(s.count)
        })),
        stop_rx,
    );

    // No jobs: many ticks, no calls.
    sleep(Duration::from_millis(100));
    assert!(seen.lock().unwrap().is_empty());

    let id = JobId { dev: 1, ino: 7 };
    registry.add(id, "docs".to_string()).unwrap();
    for _ in 0..3 {
        registry.processed(id).unwrap();
        sleep(Duration::from_millis(100));
    }
    // Finishing does not change the count.
    registry.finished(id).unwrap();
    sleep(Duration::from_millis(100));

    stop_tx.send(()).unwrap();
    reporter.join().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);

    drop(registry);
    registry_thread.join().unwrap();
}

// --- dispatcher ---

#[test]
fn test_dispatcher_skips_unknown_job_and_keeps_running() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"abc").unwrap();
    let (writer, reader) = file_objects(dir.path());
    let (registry, registry_thread) = spawn_registry();
    let (work_tx, work_rx) = bounded(0);
    let (_delete_tx, delete_rx) = unbounded();
    let (control_tx, control_rx) = bounded(1);
    let dispatcher = spawn_dispatcher(
        Dispatcher::new(writer, registry.clone(), dir.path()),
        work_rx,
        delete_rx,
        control_rx,
    );

    let unknown = JobId { dev: 9, ino: 9 };
    work_tx.send(task(unknown, 100, "ghost.txt")).unwrap();

    let known = JobId { dev: 1, ino: 2 };
    registry.add(known, ".".to_string()).unwrap();
    work_tx.send(task(known, 200, "a.txt")).unwrap();
    work_tx.send(WorkItem::Finished(known)).unwrap();

    control_tx.send(()).unwrap();
    dispatcher.join().unwrap();

    let records = reader.read::<FileRecord>(0).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].inode, 200);
    assert_eq!(records[0].relpath, "a.txt");
    assert_eq!(registry.lookup(unknown).unwrap(), None);
    let job = registry.lookup(known).unwrap().unwrap();
    assert_eq!((job.count, job.status), (1, JobStatus::Idle));

    drop(registry);
    registry_thread.join().unwrap();
}

#[test]
fn test_dispatcher_drains_queued_work_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, reader) = file_objects(dir.path());
    let (registry, registry_thread) = spawn_registry();
    let job = JobId { dev: 1, ino: 3 };
    registry.add(job, ".".to_string()).unwrap();

    // Everything is queued, control included, before the loop starts.
    let (work_tx, work_rx) = bounded(8);
    for i in 0..3 {
        work_tx.send(task(job, 10 + i, &format!("f{i}.txt"))).unwrap();
    }
    let (_delete_tx, delete_rx) = unbounded();
    let (control_tx, control_rx) = bounded(1);
    control_tx.send(()).unwrap();

    let dispatcher = spawn_dispatcher(
        Dispatcher::new(writer, registry.clone(), dir.path()),
        work_rx,
        delete_rx,
        control_rx,
    );
    dispatcher.join().unwrap();

    assert_eq!(reader.count::<FileRecord>().unwrap(), 3);
    assert_eq!(registry.lookup(job).unwrap().unwrap().count, 3);

    drop(work_tx);
    drop(registry);
    registry_thread.join().unwrap();
}

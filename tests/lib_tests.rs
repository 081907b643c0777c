use fsindexer::engine::tools::{
    base_name, clean_path, db_side_files, file_ext, is_hidden, path_relative_to,
    path_to_db_string,
};
use fsindexer::mime::{detect_mime_type, sniff};
use fsindexer::pipeline::{spawn_registry, summarize};
use fsindexer::utils::{FsindexerToml, apply_file_to_opts, db_path_from_env};
use fsindexer::{Error, IndexerOpts, JobId, JobSnapshot, JobStatus, ReportState};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- clean_path ---

#[test]
fn test_clean_path_drops_dot_and_resolves_dotdot() {
    assert_eq!(clean_path(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
    assert_eq!(clean_path(Path::new("a/b/../../c")), PathBuf::from("c"));
}

#[test]
fn test_clean_path_dotdot_at_root_stays() {
    assert_eq!(clean_path(Path::new("/../x")), PathBuf::from("/x"));
    assert_eq!(clean_path(Path::new("/..")), PathBuf::from("/"));
}

#[test]
fn test_clean_path_relative_leading_dotdot_kept() {
    assert_eq!(clean_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
    assert_eq!(clean_path(Path::new("./")), PathBuf::from("."));
    assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
}

#[test]
fn test_clean_path_escape_detected_by_relative_to() {
    let root = PathBuf::from("/srv/root");
    let escaped = clean_path(&root.join("docs/../../other"));
    assert_eq!(escaped, PathBuf::from("/srv/other"));
    assert_eq!(path_relative_to(&escaped, &root), None);
}

// --- path_relative_to / path_to_db_string ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_path_equals_base() {
    let base = PathBuf::from("/foo/bar");
    assert_eq!(path_relative_to(&base, &base), Some(PathBuf::new()));
    assert_eq!(path_to_db_string(Path::new("")), ".");
}

#[test]
fn test_path_to_db_string_forward_slashes() {
    assert_eq!(path_to_db_string(Path::new("src/main.rs")), "src/main.rs");
}

// --- file name helpers ---

#[test]
fn test_file_ext_keeps_dot() {
    assert_eq!(file_ext(Path::new("a/b.txt")).as_deref(), Some(".txt"));
    assert_eq!(file_ext(Path::new("x.tar.gz")).as_deref(), Some(".gz"));
    assert_eq!(file_ext(Path::new("Makefile")), None);
    assert_eq!(file_ext(Path::new("trailing.")).as_deref(), Some("."));
    assert_eq!(file_ext(Path::new(".bashrc")), None);
}

#[test]
fn test_base_name() {
    assert_eq!(base_name(Path::new("a/b/c.txt")), "c.txt");
    assert_eq!(base_name(Path::new("c")), "c");
}

#[test]
fn test_is_hidden() {
    assert!(is_hidden(OsStr::new(".git")));
    assert!(is_hidden(OsStr::new(".hidden")));
    assert!(!is_hidden(OsStr::new("visible.txt")));
    assert!(!is_hidden(OsStr::new("")));
}

#[test]
fn test_db_side_files() {
    let files = db_side_files(Path::new("/r/.fsindexer.db"));
    assert_eq!(
        files,
        [
            PathBuf::from("/r/.fsindexer.db"),
            PathBuf::from("/r/.fsindexer.db-wal"),
            PathBuf::from("/r/.fsindexer.db-shm"),
            PathBuf::from("/r/.fsindexer.db-journal"),
        ]
    );
}

// --- mime ---

#[test]
fn test_detect_missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(detect_mime_type(&dir.path().join("missing")).unwrap(), None);
}

#[test]
fn test_detect_empty_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("empty.txt");
    std::fs::write(&p, b"").unwrap();
    assert_eq!(detect_mime_type(&p).unwrap(), None);
}

#[test]
fn test_detect_text_and_magic() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("a.txt");
    std::fs::write(&txt, b"0123456789").unwrap();
    assert_eq!(
        detect_mime_type(&txt).unwrap().as_deref(),
        Some("text/plain; charset=utf-8")
    );
    let png = dir.path().join("image.dat");
    std::fs::write(&png, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();
    assert_eq!(detect_mime_type(&png).unwrap().as_deref(), Some("image/png"));
}

#[test]
fn test_sniff_html_and_xml() {
    assert_eq!(
        sniff(b"  <!DOCTYPE html><html></html>", Path::new("x")),
        "text/html; charset=utf-8"
    );
    assert_eq!(
        sniff(b"<?xml version=\"1.0\"?><a/>", Path::new("x")),
        "text/xml; charset=utf-8"
    );
}

#[test]
fn test_sniff_text_uses_extension_subtype() {
    assert_eq!(
        sniff(b"body { color: red }", Path::new("style.css")),
        "text/css; charset=utf-8"
    );
}

#[test]
fn test_sniff_riff_formats() {
    assert_eq!(sniff(b"RIFF\0\0\0\0WEBPVP8 ", Path::new("x")), "image/webp");
    assert_eq!(sniff(b"RIFF\0\0\0\0WAVEfmt ", Path::new("x")), "audio/wave");
}

#[test]
fn test_sniff_binary_falls_back_to_extension_then_octet_stream() {
    let binary = [0u8, 1, 2, 3, 0xfe, 0xff];
    assert_eq!(sniff(&binary, Path::new("photo.png")), "image/png");
    assert_eq!(
        sniff(&binary, Path::new("blob.unknownext")),
        "application/octet-stream"
    );
}

// --- config file ---

#[test]
fn test_fsindexer_toml_applies_present_fields() {
    let file = FsindexerToml::parse(
        r#"
        [settings]
        db_path = "idx/my.db"
        follow_links = true
        queue_depth = 8
        report_interval_ms = 250
        verbose = true
        "#,
    )
    .unwrap();
    let mut opts = IndexerOpts {
        root: PathBuf::from("/data"),
        ..Default::default()
    };
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.db_path, Some(PathBuf::from("/data/idx/my.db")));
    assert!(opts.follow_links);
    assert_eq!(opts.queue_depth, 8);
    assert_eq!(opts.report_interval, Duration::from_millis(250));
    assert!(opts.create_tables);
    assert_eq!(file.verbose(), Some(true));
}

#[test]
fn test_fsindexer_toml_empty_keeps_defaults() {
    let file = FsindexerToml::parse("").unwrap();
    let mut opts = IndexerOpts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.db_path, None);
    assert_eq!(opts.queue_depth, 0);
    assert_eq!(opts.report_interval, Duration::from_secs(1));
    assert_eq!(file.verbose(), None);
}

#[test]
fn test_fsindexer_toml_rejects_wrong_types() {
    assert!(FsindexerToml::parse("[settings]\nqueue_depth = \"many\"").is_err());
}

#[test]
fn test_db_path_from_dotenv() {
    if std::env::var_os("FSINDEXER_DB").is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(db_path_from_env(dir.path()), None);
    std::fs::write(dir.path().join(".env"), "FSINDEXER_DB=custom.db\n").unwrap();
    assert_eq!(
        db_path_from_env(dir.path()),
        Some(dir.path().join("custom.db"))
    );
}

// --- reporter summary ---

fn snapshot(ino: u64, count: u64, status: JobStatus) -> JobSnapshot {
    JobSnapshot {
        id: JobId { dev: 1, ino },
        name: format!("job{ino}"),
        count,
        status,
    }
}

#[test]
fn test_summarize_sums_counts_and_done() {
    let state = summarize(&[
        snapshot(1, 3, JobStatus::Idle),
        snapshot(2, 4, JobStatus::Indexing),
    ]);
    assert_eq!(
        state,
        ReportState {
            count: 7,
            jobs: 2,
            done: 1
        }
    );
    assert_eq!(state.to_string(), "7 items indexed, running");
}

#[test]
fn test_report_state_finished() {
    let state = summarize(&[snapshot(1, 2, JobStatus::Idle)]);
    assert_eq!(state.to_string(), "2 items indexed, finished");
    assert_eq!(summarize(&[]).to_string(), "0 items indexed, finished");
}

// --- registry actor ---

#[test]
fn test_registry_add_lookup_finish() {
    let (registry, thread) = spawn_registry();
    let id = JobId { dev: 3, ino: 9 };
    registry.add(id, "docs".to_string()).unwrap();
    assert!(matches!(
        registry.add(id, "again".to_string()),
        Err(Error::BadParameter(_))
    ));

    registry.processed(id).unwrap();
    registry.processed(id).unwrap();
    let job = registry.lookup(id).unwrap().unwrap();
    assert_eq!((job.count, job.status), (2, JobStatus::Indexing));

    registry.finished(id).unwrap();
    registry.finished(id).unwrap();
    let jobs = registry.list().unwrap();
    assert_eq!(jobs, vec![snapshot_named(id, "docs", 2, JobStatus::Idle)]);

    assert_eq!(registry.lookup(JobId { dev: 3, ino: 10 }).unwrap(), None);
    drop(registry);
    thread.join().unwrap();
}

fn snapshot_named(id: JobId, name: &str, count: u64, status: JobStatus) -> JobSnapshot {
    JobSnapshot {
        id,
        name: name.to_string(),
        count,
        status,
    }
}

#[test]
fn test_job_id_display() {
    assert_eq!(JobId { dev: 66306, ino: 1234 }.to_string(), "66306:1234");
    assert_eq!(JobStatus::Indexing.to_string(), "indexing");
}

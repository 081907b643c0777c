//! Command handlers for index, count, query and drop

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::engine::arg_parser::{Cli, Commands};
use crate::engine::db_ops::Store;
use crate::engine::progress::{create_counter, finish_counter, progress_callback, refresh_bar};
use crate::engine::tools::running_as_root;
use crate::schema::{Objects, Record};
use crate::utils::config::{DEFAULT_QUERY_LIMIT, PackagePaths};
use crate::utils::{FsindexerToml, apply_file_to_opts, db_path_from_env, load_fsindexer_toml, setup_logging};
use crate::{FileRecord, Indexer, IndexerOpts};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Layering: defaults → `.fsindexer.toml` → FSINDEXER_DB → CLI flags.
fn build_opts(cli: &Cli, file: Option<&FsindexerToml>) -> IndexerOpts {
    let mut opts = IndexerOpts {
        root: cli.root.clone(),
        ..Default::default()
    };
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(db) = db_path_from_env(&cli.root) {
        opts.db_path = Some(db);
    }
    if let Some(db) = cli.db_path() {
        opts.db_path = Some(db);
    }
    if let Some(follow) = cli.follow_links {
        opts.follow_links = follow;
    }
    opts
}

/// Load config, set up logging, run the subcommand.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let file = load_fsindexer_toml(&cli.root);
    let verbose = cli
        .verbose
        .or_else(|| file.as_ref().and_then(FsindexerToml::verbose))
        .unwrap_or(false);
    setup_logging(verbose);
    if running_as_root() {
        info!("Running as root; the index will record files other users cannot read.");
    }

    let opts = build_opts(cli, file.as_ref());
    debug!("{} CONFIG:{:#?}", PackagePaths::get().pkg_name().to_uppercase(), opts);

    match &cli.command {
        Commands::Index { paths, queue_depth } => {
            let mut opts = opts;
            if let Some(depth) = queue_depth {
                opts.queue_depth = *depth;
            }
            handle_index(opts, paths, verbose)
        }
        Commands::Count => handle_count(opts),
        Commands::Query { limit, json } => {
            handle_query(opts, limit.unwrap_or(DEFAULT_QUERY_LIMIT), *json)
        }
        Commands::Drop => handle_drop(cli, opts),
    }
}

/// Register every path, wait until all jobs are idle or Ctrl+C, then shut down.
fn handle_index(mut opts: IndexerOpts, paths: &[PathBuf], verbose: bool) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("install Ctrl+C handler")?;
    }

    let counter = verbose.then(|| create_counter("Indexing"));
    if let Some(pb) = &counter {
        opts.on_progress = Some(progress_callback(pb));
        refresh_bar(pb);
    }

    let mut indexer = Indexer::open(opts).context("open indexer")?;
    for path in paths {
        let id = indexer
            .add_index(path, false)
            .with_context(|| format!("add index {}", path.display()))?;
        debug!("{} → job {}", path.display(), id);
    }

    while !indexer.all_idle()? {
        if interrupted.load(Ordering::SeqCst) {
            warn!("Interrupted; stopping walkers");
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    // Job snapshots go away with the registry, so take them before shutting down.
    let jobs = indexer.indexes()?;
    indexer.shutdown().context("shutdown")?;

    let count = indexer.count()?;
    if let Some(pb) = &counter {
        finish_counter(pb, count);
    }
    for job in jobs {
        info!("{}: {} files ({})", job.name, job.count, job.status);
    }
    info!("{} files in {}", count, indexer.db_path().display());
    Ok(())
}

fn handle_count(opts: IndexerOpts) -> Result<()> {
    let indexer = Indexer::open(opts).context("open indexer")?;
    println!("{}", indexer.count()?);
    indexer.close()?;
    Ok(())
}

fn handle_query(opts: IndexerOpts, limit: u64, json: bool) -> Result<()> {
    let indexer = Indexer::open(opts).context("open indexer")?;
    for record in indexer.query(limit)? {
        if json {
            println!("{}", serde_json::to_string(&record).context("serialize record")?);
        } else {
            print_record(&record);
        }
    }
    indexer.close()?;
    Ok(())
}

fn print_record(r: &FileRecord) {
    let path = if r.root == "." {
        r.relpath.clone()
    } else {
        format!("{}/{}", r.root, r.relpath)
    };
    println!(
        "{:>12} {:>10} {:<32} {}",
        r.inode,
        r.size,
        r.mime_type.as_deref().unwrap_or("-"),
        path
    );
}

fn handle_drop(cli: &Cli, opts: IndexerOpts) -> Result<()> {
    let db_path = opts.db_path.unwrap_or_else(|| cli.default_db_path());
    let store = Store::open(&db_path).with_context(|| format!("open {}", db_path.display()))?;
    let mut objects = Objects::new(store, false);
    objects.drop_table::<FileRecord>().context("drop file table")?;
    info!("Dropped {} table in {}", FileRecord::table_name(), db_path.display());
    Ok(())
}

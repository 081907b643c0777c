//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived paths: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    db_filename: String,
    config_filename: String,
    env_var_db: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache paths from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                db_filename: format!(".{pkg}.db"),
                config_filename: format!(".{pkg}.toml"),
                env_var_db: format!("{}_DB", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Default index database filename, created in the indexer root.
    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }

    /// Per-root config file (`.fsindexer.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable overriding the db path (`FSINDEXER_DB`).
    pub fn env_var_db(&self) -> &str {
        &self.env_var_db
    }
}

// ---- Pipeline ----

/// Capacity of the walker → dispatcher channel. 0 is a rendezvous: each send waits for the dispatcher.
pub const DEFAULT_QUEUE_DEPTH: usize = 0;

/// How often the reporter summarises job progress.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

// ---- MIME ----

/// Bytes read from the head of a file for content sniffing.
pub const MIME_SNIFF_LEN: usize = 512;

/// Reported when sniffing and extension lookup both come up empty.
pub const MIME_FALLBACK: &str = "application/octet-stream";

// ---- Database ----

/// How long a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Rows printed by `query` when no limit is given.
pub const DEFAULT_QUERY_LIMIT: u64 = 100;

//! Load `.fsindexer.toml` from the root directory (CLI only). The library takes its config via IndexerOpts.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config::PackagePaths;
use crate::IndexerOpts;

#[derive(Debug, Default, Deserialize)]
pub struct FsindexerToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    db_path: Option<String>,
    follow_links: Option<bool>,
    verbose: Option<bool>,
    queue_depth: Option<usize>,
    report_interval_ms: Option<u64>,
    create_tables: Option<bool>,
}

impl FsindexerToml {
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Load the config file from `dir` if present. Returns None if missing or unreadable; parse errors are logged.
pub fn load_fsindexer_toml(dir: &Path) -> Option<FsindexerToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    FsindexerToml::parse(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// A relative `db_path` resolves against the indexer root.
pub fn apply_file_to_opts(file: &FsindexerToml, opts: &mut IndexerOpts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.db_path {
        let p = PathBuf::from(p);
        opts.db_path = Some(if p.is_absolute() { p } else { opts.root.join(p) });
    }
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, queue_depth => queue_depth);
    apply_file_opt!(sec, opts, create_tables => create_tables);
    if let Some(ms) = sec.report_interval_ms {
        opts.report_interval = Duration::from_millis(ms);
    }
}

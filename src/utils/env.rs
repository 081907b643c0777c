//! Database path from the environment: `FSINDEXER_DB` → `.env` in the root.

use log::debug;
use std::path::{Path, PathBuf};

use super::config::PackagePaths;

fn non_empty_var(key: &str) -> Option<String> {
    let s = std::env::var(key).ok()?;
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// Db path override: process env first, then a `.env` file in `dir`. Relative values resolve against `dir`.
pub fn db_path_from_env(dir: &Path) -> Option<PathBuf> {
    let key = PackagePaths::get().env_var_db();
    let value = non_empty_var(key).or_else(|| {
        let env_path = dir.join(".env");
        if !env_path.is_file() {
            return None;
        }
        if let Err(e) = dotenvy::from_path(&env_path) {
            debug!("{}: {}", env_path.display(), e);
            return None;
        }
        non_empty_var(key)
    })?;
    debug!("db path from {key}: {value}");
    let path = PathBuf::from(value);
    Some(if path.is_absolute() {
        path
    } else {
        dir.join(path)
    })
}

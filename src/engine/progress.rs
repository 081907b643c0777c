//! Progress counter for the `index` command, fed by the reporter.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::{ProgressCallback, ReportState};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Move the counter to `count`. The reporter sends totals, so this sets rather than adds.
/// Uses try_lock so a contended bar never blocks the reporter; the next tick catches up.
pub fn set_counter(pb: &ProgressBar, count: u64) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update_to(count as usize);
    }
}

/// Reporter callback that drives `pb`.
pub fn progress_callback(pb: &ProgressBar) -> ProgressCallback {
    let pb = Arc::clone(pb);
    Arc::new(move |state: &ReportState| set_counter(&pb, state.count))
}

/// Final update and newline once indexing is over.
pub fn finish_counter(pb: &ProgressBar, count: u64) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update_to(count as usize);
        let _ = bar.refresh();
        eprintln!();
    }
}

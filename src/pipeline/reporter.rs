//! Periodic progress summary over the registry. Read-only.

use crossbeam_channel::{Receiver, select, tick};
use log::{debug, info};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::registry::RegistryHandle;
use crate::{JobSnapshot, JobStatus, ProgressCallback, ReportState};

/// Sum processed counts and count finished jobs.
pub fn summarize(jobs: &[JobSnapshot]) -> ReportState {
    ReportState {
        count: jobs.iter().map(|j| j.count).sum(),
        jobs: jobs.len(),
        done: jobs.iter().filter(|j| j.status == JobStatus::Idle).count(),
    }
}

/// Tick every `interval`; when the total count moved since the previous tick, log it and call `on_progress`.
/// Stops on a message (or disconnect) on `stop_rx`, or when the registry is gone.
pub fn spawn_reporter(
    registry: RegistryHandle,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
    stop_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let ticker = tick(interval);
        let mut last = ReportState::default();
        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {
                    let Ok(jobs) = registry.list() else { break };
                    let state = summarize(&jobs);
                    if state.count != last.count {
                        info!("{state}");
                        if let Some(cb) = &on_progress {
                            cb(&state);
                        }
                    }
                    last = state;
                }
            }
        }
        debug!("reporter stopped");
    })
}

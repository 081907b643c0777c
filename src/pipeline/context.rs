//! Channels connecting walkers, the dispatcher and the reporter.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::{JobId, WorkItem};

/// Every channel the pipeline uses. The indexer keeps the senders; the receivers go to the
/// dispatcher (work, delete, control) and the reporter (reporter_stop).
pub struct PipelineChannels {
    pub work_tx: Sender<WorkItem>,
    pub work_rx: Receiver<WorkItem>,
    pub delete_tx: Sender<JobId>,
    pub delete_rx: Receiver<JobId>,
    pub control_tx: Sender<()>,
    pub control_rx: Receiver<()>,
    pub reporter_stop_tx: Sender<()>,
    pub reporter_stop_rx: Receiver<()>,
}

/// `queue_depth` bounds the work channel; 0 means each send blocks until the dispatcher takes it.
pub fn create_pipeline_channels(queue_depth: usize) -> PipelineChannels {
    let (work_tx, work_rx) = bounded::<WorkItem>(queue_depth);
    let (delete_tx, delete_rx) = unbounded::<JobId>();
    let (control_tx, control_rx) = bounded::<()>(1);
    let (reporter_stop_tx, reporter_stop_rx) = bounded::<()>(1);
    PipelineChannels {
        work_tx,
        work_rx,
        delete_tx,
        delete_rx,
        control_tx,
        control_rx,
        reporter_stop_tx,
        reporter_stop_rx,
    }
}

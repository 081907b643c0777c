//! Pipeline components: job registry, walkers, the single writer and the progress reporter.

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod reporter;
pub mod walk;

pub use context::{PipelineChannels, create_pipeline_channels};
pub use dispatcher::{Dispatcher, spawn_dispatcher};
pub use registry::{RegistryHandle, spawn_registry};
pub use reporter::{spawn_reporter, summarize};
pub use walk::{WalkContext, spawn_walker, walk_job};

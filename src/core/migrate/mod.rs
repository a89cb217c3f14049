//! Migration orchestration
//!
//! The generic batch runner, the per-entity tasks it drives, the
//! progress event stream and the persisted run state.

pub mod progress;
pub mod runner;
pub mod state;
pub mod task;

pub use progress::{progress_channel, ProgressEvent, PROGRESS_CHANNEL_CAPACITY};
pub use runner::{MigrationRunner, RunContext, RunReport, RunnerConfig};
pub use state::MigrationState;
pub use task::{CustomerTask, MigrationTask, OrderTask, ProductTask, TaskOutput};

//! Instance lifecycle: create from a snapshot, wait, list, optionally pause,
//! delete, wait.

pub mod config;
pub mod error;
pub mod orchestrator;


pub use config::{
    DEFAULT_INSTANCE_NAME, DEFAULT_SNAPSHOT_NAME, DEFAULT_SNAPSHOT_PROJECT, DEFAULT_STARTUP_SCRIPT,
    DEFAULT_ZONE, LifecycleConfig, Mode,
};
pub use error::{LifecycleError, LifecycleResult};
pub use orchestrator::{Stage, report_instances, run, run_with_input, wait_for_confirmation};

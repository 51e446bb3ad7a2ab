use std::path::PathBuf;

use crate::gcp::gce::PollingPolicy;
use crate::gcp::gce::defaults::DEFAULT_MACHINE_TYPE;
use crate::gcp::gce::types::SnapshotReference;

use super::error::LifecycleError;

/// Default zone instances are created in.
pub const DEFAULT_ZONE: &str = "us-central1-f";

/// Default name of the instance created and deleted by a run.
pub const DEFAULT_INSTANCE_NAME: &str = "demo-instance";

/// Default snapshot the boot disk is restored from.
pub const DEFAULT_SNAPSHOT_NAME: &str = "test-604";

/// Default project owning [`DEFAULT_SNAPSHOT_NAME`].
pub const DEFAULT_SNAPSHOT_PROJECT: &str = "gce-scripting-experiments";

/// Default location of the startup script, relative to the working directory.
pub const DEFAULT_STARTUP_SCRIPT: &str = "startup_scripts/hello_world.sh";

/// How the instance's boot disk is provisioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Fresh image. Currently performs no work at all.
    #[value(alias = "new")]
    Plain,
    /// Boot disk restored from a snapshot, then the full create/delete cycle.
    #[value(name = "snapshot-based", alias = "snapshot")]
    SnapshotBased,
}

/// Everything one lifecycle run needs.
#[derive(Clone, Debug)]
pub struct LifecycleConfig {
    pub project: String,
    pub zone: String,
    pub instance_name: String,
    pub mode: Mode,
    pub snapshot: SnapshotReference,
    pub startup_script: PathBuf,
    pub machine_type: String,
    /// Wait for a line on stdin before deleting the instance.
    pub interactive: bool,
    pub polling: PollingPolicy,
}

impl LifecycleConfig {
    /// Config for `project` with every other field at its default.
    pub fn new(project: impl Into<String>, mode: Mode) -> Self {
        Self {
            project: project.into(),
            zone: DEFAULT_ZONE.to_string(),
            instance_name: DEFAULT_INSTANCE_NAME.to_string(),
            mode,
            snapshot: SnapshotReference {
                project: DEFAULT_SNAPSHOT_PROJECT.to_string(),
                name: DEFAULT_SNAPSHOT_NAME.to_string(),
            },
            startup_script: PathBuf::from(DEFAULT_STARTUP_SCRIPT),
            machine_type: DEFAULT_MACHINE_TYPE.to_string(),
            interactive: false,
            polling: PollingPolicy::default(),
        }
    }

    /// Checks the fields a snapshot-based run depends on.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.mode != Mode::SnapshotBased {
            return Ok(());
        }
        if self.polling.interval.is_zero() {
            return Err(LifecycleError::Configuration(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        let required = [
            ("project", &self.project),
            ("zone", &self.zone),
            ("instance name", &self.instance_name),
            ("snapshot project", &self.snapshot.project),
            ("snapshot name", &self.snapshot.name),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(LifecycleError::Configuration(format!(
                    "{} is required in snapshot-based mode",
                    what
                )));
            }
        }
        Ok(())
    }
}

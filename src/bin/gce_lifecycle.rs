use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use gce_lifecycle::gcp::gce::defaults::DEFAULT_MACHINE_TYPE;
use gce_lifecycle::gcp::gce::{ComputeClient, GCE_API_BASE, PollingPolicy, SnapshotReference};
use gce_lifecycle::lifecycle::{self, LifecycleConfig, Mode};

#[derive(Parser, Debug)]
#[command(
    name = "gce_lifecycle",
    about = "Create a GCE instance from a disk snapshot, list the zone, then delete the instance"
)]
struct Args {
    /// Your Google Cloud project ID.
    #[arg(value_name = "PROJECT_ID")]
    project_id: String,

    /// Create the instance from a snapshot, or from a clean image.
    #[arg(value_name = "MODE", value_enum)]
    mode: Mode,

    /// Compute Engine zone to deploy to.
    #[arg(long, default_value = lifecycle::DEFAULT_ZONE)]
    zone: String,

    /// New instance name.
    #[arg(long, default_value = lifecycle::DEFAULT_INSTANCE_NAME)]
    name: String,

    /// Name of the disk snapshot to create the instance from.
    #[arg(long = "snapshot_name", default_value = lifecycle::DEFAULT_SNAPSHOT_NAME)]
    snapshot_name: String,

    /// Google Cloud project ID the snapshot belongs to.
    #[arg(long = "snapshot_project", default_value = lifecycle::DEFAULT_SNAPSHOT_PROJECT)]
    snapshot_project: String,

    /// Script passed to the instance as `startup-script` metadata.
    #[arg(long = "startup_script", default_value = lifecycle::DEFAULT_STARTUP_SCRIPT)]
    startup_script: PathBuf,

    /// Machine type of the new instance, e.g. `e2-small`.
    #[arg(long = "machine_type", default_value = DEFAULT_MACHINE_TYPE)]
    machine_type: String,

    /// Wait for Enter before deleting the instance.
    #[arg(long)]
    interactive: bool,

    /// Delay between two operation status checks, in milliseconds.
    #[arg(
        long = "poll_interval_ms",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval_ms: u64,

    /// Upper bound on each operation wait; 0 waits forever.
    #[arg(long = "operation_timeout_secs", default_value_t = 600)]
    operation_timeout_secs: u64,

    /// Compute Engine REST endpoint.
    #[arg(long = "api_base", default_value = GCE_API_BASE)]
    api_base: String,

    /// OAuth access token, e.g. from `gcloud auth print-access-token`.
    #[arg(
        long = "access_token",
        env = "GOOGLE_OAUTH_ACCESS_TOKEN",
        hide_env_values = true
    )]
    access_token: Option<String>,
}

impl Args {
    fn config(&self) -> LifecycleConfig {
        let timeout = match self.operation_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        LifecycleConfig {
            project: self.project_id.clone(),
            zone: self.zone.clone(),
            instance_name: self.name.clone(),
            mode: self.mode,
            snapshot: SnapshotReference {
                project: self.snapshot_project.clone(),
                name: self.snapshot_name.clone(),
            },
            startup_script: self.startup_script.clone(),
            machine_type: self.machine_type.clone(),
            interactive: self.interactive,
            polling: PollingPolicy {
                interval: Duration::from_millis(self.poll_interval_ms),
                timeout,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    gce_lifecycle::init_logging();
    let args = Args::parse();
    let config = args.config();
    tracing::info!(
        project = %config.project,
        zone = %config.zone,
        instance = %config.instance_name,
        mode = ?config.mode,
        "starting lifecycle run"
    );

    let client = ComputeClient::new(&args.api_base, args.access_token.clone())
        .context("Failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("Ctrl+C detected, cancelling.");
        on_signal.cancel();
    })
    .context("Failed to install Ctrl+C handler")?;

    if let Err(e) = lifecycle::run(&client, &config, &cancel).await {
        eprintln!("Instance lifecycle failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

//! Create → wait → list → pause → delete → wait, one instance at a time.

use std::fmt;
use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::gcp::gce::defaults::create_instance_from_snapshot;
use crate::gcp::gce::types::Instance;
use crate::gcp::gce::{ComputeApi, OperationPoller};

use super::config::{LifecycleConfig, Mode};
use super::error::{LifecycleError, LifecycleResult};

/// Steps of a snapshot-based run, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Creating,
    WaitingCreate,
    Listing,
    Ready,
    Deleting,
    WaitingDelete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Creating => "creating",
            Stage::WaitingCreate => "waiting for create",
            Stage::Listing => "listing",
            Stage::Ready => "ready",
            Stage::Deleting => "deleting",
            Stage::WaitingDelete => "waiting for delete",
        };
        f.write_str(s)
    }
}

/// Runs the lifecycle once, pausing on stdin when `config.interactive` is set.
pub async fn run<C: ComputeApi + ?Sized>(
    client: &C,
    config: &LifecycleConfig,
    cancel: &CancellationToken,
) -> LifecycleResult<()> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    run_with_input(client, config, cancel, &mut stdin).await
}

/// Same as [`run`], reading the confirmation line from `input`.
pub async fn run_with_input<C, R>(
    client: &C,
    config: &LifecycleConfig,
    cancel: &CancellationToken,
    input: &mut R,
) -> LifecycleResult<()>
where
    C: ComputeApi + ?Sized,
    R: AsyncBufRead + Unpin + Send,
{
    if config.mode == Mode::Plain {
        // No image-selection contract exists for fresh instances.
        tracing::info!(project = %config.project, "plain mode: nothing to do");
        return Ok(());
    }

    config.validate()?;
    let startup_script = read_startup_script(&config.startup_script).await?;
    let poller = OperationPoller::new(client, &config.project, &config.zone, config.polling);
    let name = config.instance_name.as_str();

    enter(Stage::Creating, cancel)?;
    println!("Creating instance.");
    let snapshot = client
        .get_snapshot(&config.snapshot.project, &config.snapshot.name)
        .await?;
    let descriptor = create_instance_from_snapshot(
        name,
        &config.zone,
        &config.machine_type,
        &snapshot,
        &startup_script,
    );
    let op = client
        .insert_instance(&config.project, &config.zone, &descriptor)
        .await?;

    let remaining = async {
        enter(Stage::WaitingCreate, cancel)?;
        println!("Waiting for operation to finish...");
        poller.wait(&op.name, cancel).await?;
        println!("done.");

        enter(Stage::Listing, cancel)?;
        let instances = client.list_instances(&config.project, &config.zone).await?;
        for line in report_instances(&config.project, &config.zone, instances.as_deref()) {
            println!("{}", line);
        }
        println!("Instance Created");

        enter(Stage::Ready, cancel)?;
        if config.interactive {
            println!("Press Enter to delete instance {}.", name);
            wait_for_confirmation(input, cancel).await?;
        }

        enter(Stage::Deleting, cancel)?;
        println!("Deleting instance.");
        let op = client
            .delete_instance(&config.project, &config.zone, name)
            .await?;

        enter(Stage::WaitingDelete, cancel)?;
        println!("Waiting for operation to finish...");
        poller.wait(&op.name, cancel).await?;
        println!("done.");
        Ok::<(), LifecycleError>(())
    }
    .await;

    if let Err(ref e) = remaining {
        // A failed create operation leaves nothing behind; anything else may.
        if !matches!(e, LifecycleError::Operation(oe) if oe.operation == op.name) {
            tracing::warn!(
                instance = name,
                zone = %config.zone,
                error = %e,
                "run aborted after insert; instance may still be running"
            );
        }
    }
    remaining
}

fn enter(stage: Stage, cancel: &CancellationToken) -> LifecycleResult<()> {
    if cancel.is_cancelled() {
        tracing::info!(%stage, "cancelled before stage");
        return Err(LifecycleError::Cancelled);
    }
    tracing::debug!(%stage, "entering stage");
    Ok(())
}

async fn read_startup_script(path: &Path) -> LifecycleResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LifecycleError::StartupScript {
            path: path.to_path_buf(),
            source,
        })
}

/// Blocks until a line (or EOF) arrives on `input`, or `cancel` fires.
pub async fn wait_for_confirmation<R>(input: &mut R, cancel: &CancellationToken) -> LifecycleResult<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut line = String::new();
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LifecycleError::Cancelled),
        res = input.read_line(&mut line) => res.map(|_| ()).map_err(LifecycleError::Prompt),
    }
}

/// Renders the listing printed after creation.
///
/// An absent `items` field reads as "no instances" instead of an empty list.
pub fn report_instances(project: &str, zone: &str, instances: Option<&[Instance]>) -> Vec<String> {
    let mut lines = vec![format!(
        "Instances in project {} and zone {}:",
        project, zone
    )];
    match instances {
        None => lines.push(" (no instances)".to_string()),
        Some(list) => lines.extend(list.iter().map(|i| format!(" - {}", i.name))),
    }
    lines
}

// # gce-lifecycle: Compute Engine Instance Lifecycle
//
// Creates a Compute Engine instance from a disk snapshot, waits for the
// insert operation, lists the zone, optionally pauses, then deletes the
// instance and waits again.
//
// The API client sits behind the `ComputeApi` trait so the orchestration can
// run against the REST client or a scripted fake.

/// Google Cloud Platform clients.
pub mod gcp;

/// The create/list/delete sequence and its configuration.
pub mod lifecycle;

/// Installs the `tracing` subscriber used by the binaries.
///
/// Diagnostics go to stderr so stdout keeps only progress output.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

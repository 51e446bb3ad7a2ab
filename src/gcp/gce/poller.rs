//! # Zonal Operation Poller
//!
//! Compute Engine has no push notification for long-running operations, so
//! callers re-fetch the operation at a fixed interval until it reports `DONE`.
//! The wait is bounded by an optional deadline and can be cancelled.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::gcp::gce::client::ComputeApi;
use crate::gcp::gce::error::{OperationError, TransportError};
use crate::gcp::gce::types::Operation;

/// Default delay between two status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default bound on a single wait.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(600);

/// How often to poll and how long to wait at most.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollingPolicy {
    pub interval: Duration,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(DEFAULT_OPERATION_TIMEOUT),
        }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("failed to fetch status of operation {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("operation {operation} not done after {elapsed:?} ({polls} polls)")]
    DeadlineExceeded {
        operation: String,
        elapsed: Duration,
        polls: u32,
    },

    #[error("wait for operation {operation} was cancelled")]
    Cancelled { operation: String },
}

/// Waits on zonal operations of one project and zone.
pub struct OperationPoller<'a, C: ComputeApi + ?Sized> {
    client: &'a C,
    project: &'a str,
    zone: &'a str,
    policy: PollingPolicy,
}

impl<'a, C: ComputeApi + ?Sized> OperationPoller<'a, C> {
    pub fn new(client: &'a C, project: &'a str, zone: &'a str, policy: PollingPolicy) -> Self {
        Self {
            client,
            project,
            zone,
            policy,
        }
    }

    /// Blocks until `operation` is `DONE`, the deadline passes, or `cancel` fires.
    ///
    /// The first fetch is issued immediately; the interval sleep only happens
    /// between fetches. A `DONE` operation with an error payload is returned
    /// as [`WaitError::Operation`].
    pub async fn wait(
        &self,
        operation: &str,
        cancel: &CancellationToken,
    ) -> Result<Operation, WaitError> {
        let started = Instant::now();
        // A timeout past the clock's range is treated as no timeout.
        let deadline = self.policy.timeout.and_then(|t| started.checked_add(t));
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(operation)),
                _ = until(deadline) => return Err(self.deadline(operation, started, polls - 1)),
                res = self.client.get_operation(self.project, self.zone, operation) => res,
            };
            let op = fetched.map_err(|source| WaitError::Transport {
                operation: operation.to_string(),
                source,
            })?;
            tracing::debug!(operation, status = ?op.status, polls, "polled operation");

            if op.is_done() {
                if let Some(payload) = op.error_payload() {
                    return Err(OperationError {
                        operation: op.name.clone(),
                        payload: payload.clone(),
                    }
                    .into());
                }
                return Ok(op);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(self.cancelled(operation)),
                _ = until(deadline) => return Err(self.deadline(operation, started, polls)),
                _ = sleep(self.policy.interval) => {}
            }
        }
    }

    fn cancelled(&self, operation: &str) -> WaitError {
        tracing::info!(operation, "operation wait cancelled");
        WaitError::Cancelled {
            operation: operation.to_string(),
        }
    }

    fn deadline(&self, operation: &str, started: Instant, polls: u32) -> WaitError {
        WaitError::DeadlineExceeded {
            operation: operation.to_string(),
            elapsed: started.elapsed(),
            polls,
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

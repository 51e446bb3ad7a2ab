use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::gcp::gce::{OperationError, TransportError, WaitError};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read startup script {}: {source}", path.display())]
    StartupScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("operation {operation} not done after {elapsed:?}")]
    DeadlineExceeded {
        operation: String,
        elapsed: Duration,
    },

    #[error("run cancelled")]
    Cancelled,

    #[error("failed to read confirmation from stdin: {0}")]
    Prompt(#[source] std::io::Error),
}

impl From<WaitError> for LifecycleError {
    fn from(e: WaitError) -> Self {
        match e {
            WaitError::Transport { source, .. } => LifecycleError::Transport(source),
            WaitError::Operation(e) => LifecycleError::Operation(e),
            WaitError::DeadlineExceeded {
                operation, elapsed, ..
            } => LifecycleError::DeadlineExceeded { operation, elapsed },
            WaitError::Cancelled { .. } => LifecycleError::Cancelled,
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

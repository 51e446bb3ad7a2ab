use serde_json::Value;
use thiserror::Error;

/// A Compute Engine API call failed outright.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{method} {url} could not be sent: {source}")]
    Request {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} failed (status {status}): {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{method} {url} returned an unreadable body: {source}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// HTTP status of a rejected call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A finished operation reported an error payload.
#[derive(Debug, Error)]
#[error("operation {operation} failed: {payload}")]
pub struct OperationError {
    pub operation: String,
    pub payload: Value,
}

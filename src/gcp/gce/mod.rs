//! # Google Compute Engine (GCE) Client
//!
//! This module provides a client for the Google Compute Engine API, used to
//! create, list and delete virtual machine instances and to wait for the
//! zonal operations those calls start.
//!
//! ## Submodules
//! - `client`: The `ComputeApi` trait and its REST implementation.
//! - `defaults`: Builds the instance configuration submitted on insert.
//! - `error`: Transport and operation failures.
//! - `poller`: Fixed-interval, deadline-bounded operation polling.
//! - `types`: Data structures serialized to and from the GCE API.

/// Core client for GCE API requests.
pub mod client;
/// Helper functions for creating GCE instance configurations.
pub mod defaults;
/// Error types for GCE API calls.
pub mod error;
/// Waiting on long-running zonal operations.
pub mod poller;
/// Data structures for the GCE API.
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key components to provide a convenient public API for this module.
pub use crate::gcp::gce::client::{ComputeApi, ComputeClient, GCE_API_BASE};
pub use crate::gcp::gce::defaults::{create_instance_descriptor, create_instance_from_snapshot};
pub use crate::gcp::gce::error::{OperationError, TransportError};
pub use crate::gcp::gce::poller::{OperationPoller, PollingPolicy, WaitError};
pub use crate::gcp::gce::types::*;

//! # Google Compute Engine (GCE) Data Types
//!
//! This module defines the Rust structs that model the JSON objects exchanged
//! with the Compute Engine v1 API: the `instances.insert` request body, the
//! zonal `Operation` resource, snapshots and instance listings.
//!
//! Only the fields this crate reads or writes are modelled; unknown fields in
//! responses are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle state of a zonal operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
    /// Any status string the API adds later. Never terminal.
    #[serde(other)]
    Unknown,
}

/// A handle to an asynchronous, provider-side state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Server-assigned identifier, used to poll the operation.
    pub name: String,
    pub status: OperationStatus,
    /// Error payload of a failed operation, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(rename = "operationType", default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(rename = "targetLink", default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(
        rename = "httpErrorStatusCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub http_error_status_code: Option<u16>,
    #[serde(
        rename = "httpErrorMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub http_error_message: Option<String>,
}

impl Operation {
    /// Builds a bare operation with just a name and a status.
    pub fn new(name: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            name: name.into(),
            status,
            error: None,
            operation_type: None,
            target_link: None,
            progress: None,
            http_error_status_code: None,
            http_error_message: None,
        }
    }

    /// Attaches an error payload.
    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Returns the error payload if it carries anything.
    ///
    /// `null`, `{}` and `[]` count as no error.
    pub fn error_payload(&self) -> Option<&Value> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            Value::Array(items) if items.is_empty() => None,
            payload => Some(payload),
        }
    }
}

/// A disk snapshot resource. Only the canonical reference is needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    /// Canonical URL of the snapshot, usable as a disk source.
    #[serde(rename = "selfLink")]
    pub self_link: String,
}

/// Identifies a snapshot by owning project and name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotReference {
    pub project: String,
    pub name: String,
}

/// Request body for `instances.insert`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub name: String,
    /// Partial URL of the machine type, e.g. `zones/us-central1-f/machineTypes/n1-standard-1`.
    #[serde(rename = "machineType")]
    pub machine_type: String,
    pub disks: Vec<AttachedDisk>,
    #[serde(rename = "networkInterfaces")]
    pub network_interfaces: Vec<NetworkInterface>,
    pub metadata: Metadata,
}

impl InstanceDescriptor {
    /// The disk flagged as boot disk, if any.
    pub fn boot_disk(&self) -> Option<&AttachedDisk> {
        self.disks.iter().find(|d| d.boot)
    }

    /// Looks up a metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }
}

/// An attached disk configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttachedDisk {
    pub boot: bool,
    #[serde(rename = "autoDelete")]
    pub auto_delete: bool,
    #[serde(rename = "initializeParams")]
    pub initialize_params: InitializeParams,
}

/// Where a new disk takes its contents from. Exactly one field is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "sourceImage", default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    #[serde(
        rename = "sourceSnapshot",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_snapshot: Option<String>,
}

/// Boot disk source for a new instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootSource {
    Image(String),
    Snapshot(String),
}

impl From<BootSource> for InitializeParams {
    fn from(source: BootSource) -> Self {
        match source {
            BootSource::Image(image) => InitializeParams {
                source_image: Some(image),
                source_snapshot: None,
            },
            BootSource::Snapshot(snapshot) => InitializeParams {
                source_image: None,
                source_snapshot: Some(snapshot),
            },
        }
    }
}

/// Instance metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub items: Vec<MetadataItem>,
}

/// A single metadata key-value pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

/// A network interface for the instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(rename = "accessConfigs", default)]
    pub access_configs: Vec<AccessConfig>,
}

/// Configuration for external network access.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Populated by the API once an external address is assigned.
    #[serde(rename = "natIP", default, skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
}

/// A listed instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "machineType", default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(rename = "networkInterfaces", default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Instance {
    /// External address of the first access config on the first interface.
    pub fn external_ip(&self) -> Option<&str> {
        self.network_interfaces
            .first()?
            .access_configs
            .first()?
            .nat_ip
            .as_deref()
    }
}

/// One page of `instances.list`.
///
/// `items` is omitted by the API when the zone has no instances, so it stays
/// an `Option` to keep "absent" apart from "present but empty".
#[derive(Debug, Deserialize)]
pub struct InstancePage {
    #[serde(default)]
    pub items: Option<Vec<Instance>>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_parses_api_payload() {
        let op: Operation = serde_json::from_value(json!({
            "kind": "compute#operation",
            "name": "operation-1234",
            "operationType": "insert",
            "status": "DONE",
            "progress": 100,
            "httpErrorStatusCode": 403,
            "httpErrorMessage": "FORBIDDEN",
            "error": {"errors": [{"code": "QUOTA_EXCEEDED", "message": "Quota exceeded"}]}
        }))
        .unwrap();
        assert!(op.is_done());
        assert_eq!(op.operation_type.as_deref(), Some("insert"));
        assert_eq!(op.http_error_status_code, Some(403));
        assert_eq!(
            op.error_payload().unwrap()["errors"][0]["code"],
            json!("QUOTA_EXCEEDED")
        );
    }

    #[test]
    fn unknown_status_is_not_done() {
        let op: Operation =
            serde_json::from_value(json!({"name": "op", "status": "SUSPENDED"})).unwrap();
        assert_eq!(op.status, OperationStatus::Unknown);
        assert!(!op.is_done());
    }

    #[test]
    fn empty_error_payloads_are_ignored() {
        for empty in [json!(null), json!({}), json!([])] {
            let op = Operation::new("op", OperationStatus::Done).with_error(empty);
            assert!(op.error_payload().is_none());
        }
        let op = Operation::new("op", OperationStatus::Done).with_error(json!({"code": "X"}));
        assert_eq!(op.error_payload(), Some(&json!({"code": "X"})));
    }

    #[test]
    fn instance_page_keeps_absent_and_empty_apart() {
        let absent: InstancePage = serde_json::from_value(json!({"kind": "x"})).unwrap();
        assert!(absent.items.is_none());
        let empty: InstancePage = serde_json::from_value(json!({"items": []})).unwrap();
        assert_eq!(empty.items, Some(vec![]));
    }

    #[test]
    fn boot_source_serializes_one_field() {
        let disk = AttachedDisk {
            boot: true,
            auto_delete: true,
            initialize_params: BootSource::Snapshot("projects/p/global/snapshots/s".into()).into(),
        };
        let v = serde_json::to_value(&disk).unwrap();
        assert_eq!(
            v,
            json!({
                "boot": true,
                "autoDelete": true,
                "initializeParams": {"sourceSnapshot": "projects/p/global/snapshots/s"}
            })
        );
    }

    #[test]
    fn external_ip_reads_first_access_config() {
        let inst: Instance = serde_json::from_value(json!({
            "name": "vm",
            "networkInterfaces": [{"accessConfigs": [{"natIP": "34.1.2.3"}]}]
        }))
        .unwrap();
        assert_eq!(inst.external_ip(), Some("34.1.2.3"));
    }
}

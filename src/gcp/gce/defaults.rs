//! # GCE Instance Default Configurations
//!
//! Builds the `instances.insert` body used by the lifecycle: one auto-deleted
//! boot disk, the default network with a one-to-one NAT, and a startup script
//! passed through instance metadata.

use crate::gcp::gce::types::*;

/// Machine type used when none is configured.
pub const DEFAULT_MACHINE_TYPE: &str = "n1-standard-1";

/// Metadata key the guest agent runs at boot.
pub const STARTUP_SCRIPT_KEY: &str = "startup-script";

/// Network every instance is attached to.
pub const DEFAULT_NETWORK: &str = "global/networks/default";

/// Creates an `InstanceDescriptor` booting from `boot_source`.
///
/// # Arguments
/// * `name` - The name for the new instance.
/// * `zone` - The zone for the instance (e.g., "us-central1-f").
/// * `machine_type` - The machine type (e.g., "n1-standard-1").
/// * `boot_source` - Image or snapshot the boot disk is initialized from.
/// * `startup_script` - Full contents of the script run on instance startup.
pub fn create_instance_descriptor(
    name: &str,
    zone: &str,
    machine_type: &str,
    boot_source: BootSource,
    startup_script: &str,
) -> InstanceDescriptor {
    InstanceDescriptor {
        name: name.to_string(),
        machine_type: format!("zones/{}/machineTypes/{}", zone, machine_type),
        disks: vec![AttachedDisk {
            boot: true,
            auto_delete: true,
            initialize_params: boot_source.into(),
        }],
        network_interfaces: vec![NetworkInterface {
            network: Some(DEFAULT_NETWORK.to_string()),
            access_configs: vec![AccessConfig {
                access_type: Some("ONE_TO_ONE_NAT".to_string()),
                name: Some("External NAT".to_string()),
                nat_ip: None,
            }],
        }],
        metadata: Metadata {
            items: vec![MetadataItem {
                key: STARTUP_SCRIPT_KEY.to_string(),
                value: startup_script.to_string(),
            }],
        },
    }
}

/// Creates an `InstanceDescriptor` whose boot disk is restored from `snapshot`.
pub fn create_instance_from_snapshot(
    name: &str,
    zone: &str,
    machine_type: &str,
    snapshot: &Snapshot,
    startup_script: &str,
) -> InstanceDescriptor {
    create_instance_descriptor(
        name,
        zone,
        machine_type,
        BootSource::Snapshot(snapshot.self_link.clone()),
        startup_script,
    )
}

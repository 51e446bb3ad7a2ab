/// Compute Engine instances and operations.
pub mod gce;

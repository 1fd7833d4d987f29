//! Maintenance configuration assignments
//!
//! Links a maintenance configuration to a fixed target (virtual machine,
//! scale set, dedicated host, Arc machine) or, through a dynamic scope, to
//! every machine matching a filter.

mod client;
mod dynamic_scope;
mod model;
mod target;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{API_VERSION, ArmConfigurationAssignments, ConfigurationAssignmentsClient};
pub use dynamic_scope::DynamicScopeAssignment;
pub use model::{
    AssignmentFilterProperties, ConfigurationAssignment, ConfigurationAssignmentProperties,
    DynamicScopeFilter, TagOperator, TagSettingsProperties, TagValues,
};
pub use target::{
    ArcMachineAssignment, AssignmentTarget, DedicatedHostAssignment, TargetAssignmentResource,
    VirtualMachineAssignment, VirtualMachineScaleSetAssignment,
};

use armflow_cloud::{RemoteError, TransientConditions};
use armflow_core::ResourceId;
use armflow_core::id::{ConfigurationAssignmentId, MaintenanceConfigurationId};

/// Returned while a freshly started VM cannot yet take an assignment
pub const VM_NOT_READY: &str =
    "It may take a few minutes after starting a VM for it to become available to assign to a configuration";

const MAINTENANCE_CONFIGURATION_ID: &str = "maintenance_configuration_id";

/// Transient conditions for assignment writes
pub fn transient_conditions() -> TransientConditions {
    TransientConditions::default().with_message(VM_NOT_READY)
}

pub(crate) fn normalize_location(location: &str) -> String {
    location.replace(' ', "").to_lowercase()
}

/// Canonical form of a configuration id echoed back by the API.
pub(crate) fn canonical_configuration_id(raw: &str) -> String {
    MaintenanceConfigurationId::parse_insensitively(raw)
        .map(|id| id.id())
        .unwrap_or_else(|_| raw.to_string())
}

/// Find the assignment named `name` among those attached to `scope`.
///
/// A missing match is reported as not-found so callers can treat it like a
/// failed get.
pub(crate) async fn find_assignment(
    client: &dyn ConfigurationAssignmentsClient,
    scope: &str,
    name: &str,
) -> Result<ConfigurationAssignment, RemoteError> {
    let assignments = client.list_for_scope(scope).await?;
    assignments
        .into_iter()
        .find(|a| a.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
        .ok_or_else(|| {
            RemoteError::not_found(format!(
                "{} was not found",
                ConfigurationAssignmentId::new(scope, name)
            ))
        })
}

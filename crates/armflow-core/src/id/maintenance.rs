//! Maintenance identifiers
//!
//! Configuration assignments are extension resources: their id is the id
//! of the assigned target followed by
//! `/providers/Microsoft.Maintenance/configurationAssignments/{name}`.

use super::{
    ArcMachineId, DedicatedHostId, ResourceId, Segment, VirtualMachineId,
    VirtualMachineScaleSetId,
};
use crate::error::{IdError, Result};
use std::fmt;

resource_group_scoped_id! {
    /// A maintenance configuration
    MaintenanceConfigurationId, "Maintenance Configuration", "Microsoft.Maintenance",
    { maintenance_configuration_name: "maintenanceConfigurations" => "Name" }
}

/// A configuration assignment on an arbitrary scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationAssignmentId {
    pub scope: String,
    pub configuration_assignment_name: String,
}

impl ConfigurationAssignmentId {
    pub fn new(scope: impl Into<String>, configuration_assignment_name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            configuration_assignment_name: configuration_assignment_name.into(),
        }
    }
}

impl ResourceId for ConfigurationAssignmentId {
    const DESCRIPTION: &'static str = "Configuration Assignment";
    const SEGMENTS: &'static [Segment] = &[
        Segment::scope("scope", "Scope"),
        Segment::fixed("providers"),
        Segment::provider("Microsoft.Maintenance"),
        Segment::fixed("configurationAssignments"),
        Segment::user("configuration_assignment_name", "Name"),
    ];

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            scope: values.next().unwrap_or_default(),
            configuration_assignment_name: values.next().unwrap_or_default(),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.scope.as_str(),
            self.configuration_assignment_name.as_str(),
        ]
    }
}

impl_display_and_from_str!(ConfigurationAssignmentId);

/// A dynamic scope assignment, held at subscription level:
/// `/subscriptions/{sub}/providers/Microsoft.Maintenance/configurationAssignments/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DynamicScopeAssignmentId {
    pub subscription_id: String,
    pub configuration_assignment_name: String,
}

impl DynamicScopeAssignmentId {
    pub fn new(
        subscription_id: impl Into<String>,
        configuration_assignment_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            configuration_assignment_name: configuration_assignment_name.into(),
        }
    }

    /// The same assignment seen as a scoped assignment
    pub fn as_scoped(&self) -> ConfigurationAssignmentId {
        ConfigurationAssignmentId::new(
            format!("/subscriptions/{}", self.subscription_id),
            &self.configuration_assignment_name,
        )
    }
}

impl ResourceId for DynamicScopeAssignmentId {
    const DESCRIPTION: &'static str = "Dynamic Scope Assignment";
    const SEGMENTS: &'static [Segment] = &[
        Segment::fixed("subscriptions"),
        Segment::subscription_id(),
        Segment::fixed("providers"),
        Segment::provider("Microsoft.Maintenance"),
        Segment::fixed("configurationAssignments"),
        Segment::user("configuration_assignment_name", "Name"),
    ];

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: values.next().unwrap_or_default(),
            configuration_assignment_name: values.next().unwrap_or_default(),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.configuration_assignment_name.as_str(),
        ]
    }
}

impl_display_and_from_str!(DynamicScopeAssignmentId);

/// A configuration assignment whose scope is a specific kind of target.
///
/// The assignment suffix is parsed strictly. The target scope is parsed
/// insensitively because the API echoes it back lower-cased, and the raw
/// scope text is kept so `id()` round-trips byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetAssignmentId<T> {
    pub target_id_raw: String,
    pub target_id: T,
    pub name: String,
}

pub type VirtualMachineAssignmentId = TargetAssignmentId<VirtualMachineId>;
pub type VirtualMachineScaleSetAssignmentId = TargetAssignmentId<VirtualMachineScaleSetId>;
pub type DedicatedHostAssignmentId = TargetAssignmentId<DedicatedHostId>;
pub type ArcMachineAssignmentId = TargetAssignmentId<ArcMachineId>;

impl<T: ResourceId> TargetAssignmentId<T> {
    pub fn new(target_id: T, name: impl Into<String>) -> Self {
        Self {
            target_id_raw: target_id.id(),
            target_id,
            name: name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let scoped = ConfigurationAssignmentId::parse(input)?;
        let target_id =
            T::parse_insensitively(&scoped.scope).map_err(|source| IdError::Component {
                description: ConfigurationAssignmentId::DESCRIPTION,
                input: input.to_string(),
                source: Box::new(source),
            })?;

        Ok(Self {
            target_id_raw: scoped.scope,
            target_id,
            name: scoped.configuration_assignment_name,
        })
    }

    pub fn id(&self) -> String {
        self.as_scoped().id()
    }

    pub fn as_scoped(&self) -> ConfigurationAssignmentId {
        ConfigurationAssignmentId::new(&self.target_id_raw, &self.name)
    }
}

impl<T: ResourceId> fmt::Display for TargetAssignmentId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration Assignment ({} {:?} / Name {:?})",
            T::DESCRIPTION,
            self.target_id_raw,
            self.name
        )
    }
}

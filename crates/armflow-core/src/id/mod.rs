//! Resource identifier codecs
//!
//! Every Azure resource kind gets its own identifier type. Each one can be
//! built from its parts, parsed from the canonical ARM path, rendered back
//! with [`ResourceId::id`], and described for diagnostics through `Display`.
//!
//! ```text
//! /subscriptions/{sub}/resourceGroups/{rg}/providers/{Namespace}/{type}/{name}
//! ```
//!
//! Parsing is strict for user input. `parse_insensitively` exists only for
//! ids echoed back by the API, which is known to return path literals in
//! unexpected casing.

/// Declares a resource-group scoped identifier type:
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{literal}/{field}...`
macro_rules! resource_group_scoped_id {
    (
        $(#[$meta:meta])*
        $name:ident, $description:literal, $namespace:literal,
        { $($field:ident: $literal:literal => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub subscription_id: String,
            pub resource_group_name: String,
            $(pub $field: String,)+
        }

        impl $name {
            pub fn new(
                subscription_id: impl Into<String>,
                resource_group_name: impl Into<String>,
                $($field: impl Into<String>,)+
            ) -> Self {
                Self {
                    subscription_id: subscription_id.into(),
                    resource_group_name: resource_group_name.into(),
                    $($field: $field.into(),)+
                }
            }
        }

        impl $crate::id::ResourceId for $name {
            const DESCRIPTION: &'static str = $description;
            const SEGMENTS: &'static [$crate::id::Segment] = &[
                $crate::id::Segment::fixed("subscriptions"),
                $crate::id::Segment::subscription_id(),
                $crate::id::Segment::fixed("resourceGroups"),
                $crate::id::Segment::resource_group(),
                $crate::id::Segment::fixed("providers"),
                $crate::id::Segment::provider($namespace),
                $(
                    $crate::id::Segment::fixed($literal),
                    $crate::id::Segment::user(stringify!($field), $label),
                )+
            ];

            fn from_values(values: Vec<String>) -> Self {
                let mut values = values.into_iter();
                Self {
                    subscription_id: values.next().unwrap_or_default(),
                    resource_group_name: values.next().unwrap_or_default(),
                    $($field: values.next().unwrap_or_default(),)+
                }
            }

            fn values(&self) -> Vec<&str> {
                vec![
                    self.subscription_id.as_str(),
                    self.resource_group_name.as_str(),
                    $(self.$field.as_str(),)+
                ]
            }
        }

        impl_display_and_from_str!($name);
    };
}

/// `Display` through [`ResourceId::describe`] and strict `FromStr`.
macro_rules! impl_display_and_from_str {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::id::ResourceId::describe(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::IdError;

            fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
                <Self as $crate::id::ResourceId>::parse(input)
            }
        }
    };
}

mod composite;
mod compute;
mod dataplane;
mod datashare;
mod hybrid;
mod maintenance;
mod parser;
mod resources;
mod segment;
mod storage;
mod storagepool;

pub use composite::{DiskPoolManagedDiskAttachmentId, ObjectReplicationId};
pub use compute::{
    DedicatedHostGroupId, DedicatedHostId, ManagedDiskId, VirtualMachineId,
    VirtualMachineScaleSetId,
};
pub use dataplane::{AccountEndpoint, BlobId, DataPlaneId, DataPlaneService};
pub use datashare::{DataSetId, DataShareAccountId, DataShareId};
pub use hybrid::ArcMachineId;
pub use maintenance::{
    ArcMachineAssignmentId, ConfigurationAssignmentId, DedicatedHostAssignmentId,
    DynamicScopeAssignmentId, MaintenanceConfigurationId, TargetAssignmentId,
    VirtualMachineAssignmentId, VirtualMachineScaleSetAssignmentId,
};
pub use parser::Parser;
pub use resources::{ResourceGroupId, SubscriptionId};
pub use segment::{Segment, SegmentKind};
pub use storage::{ObjectReplicationPolicyId, StorageAccountId, StorageShareId};
pub use storagepool::DiskPoolId;

use crate::error::Result;

/// Contract shared by every ARM path identifier.
pub trait ResourceId: Sized {
    /// Human-readable kind, e.g. "Virtual Machine"
    const DESCRIPTION: &'static str;

    /// Ordered grammar of the canonical path
    const SEGMENTS: &'static [Segment];

    /// Build from variable segment values in declared order.
    fn from_values(values: Vec<String>) -> Self;

    /// Variable segment values in declared order.
    fn values(&self) -> Vec<&str>;

    fn parser() -> Parser {
        Parser::new(Self::DESCRIPTION, Self::SEGMENTS)
    }

    /// Parse user-authored input; literal segments must match exactly.
    fn parse(input: &str) -> Result<Self> {
        Self::parser().parse(input, false).map(Self::from_values)
    }

    /// Parse an id returned by the API, ignoring the case of literal segments.
    fn parse_insensitively(input: &str) -> Result<Self> {
        Self::parser().parse(input, true).map(Self::from_values)
    }

    /// Canonical ARM path
    fn id(&self) -> String {
        Self::parser().format(&self.values())
    }

    /// Diagnostic label, also used by `Display`
    fn describe(&self) -> String {
        Self::parser().describe(&self.values())
    }
}

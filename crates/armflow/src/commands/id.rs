use armflow_core::id::{
    ArcMachineAssignmentId, ArcMachineId, ConfigurationAssignmentId, DataSetId,
    DataShareAccountId, DataShareId, DedicatedHostAssignmentId, DedicatedHostGroupId,
    DedicatedHostId, DiskPoolId, DiskPoolManagedDiskAttachmentId, DynamicScopeAssignmentId,
    MaintenanceConfigurationId, ManagedDiskId, ObjectReplicationId, ObjectReplicationPolicyId,
    ResourceGroupId, StorageAccountId, StorageShareId, SubscriptionId, VirtualMachineAssignmentId,
    VirtualMachineId, VirtualMachineScaleSetAssignmentId, VirtualMachineScaleSetId,
};
use armflow_core::{IdError, ResourceId};
use clap::ValueEnum;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdKind {
    Subscription,
    ResourceGroup,
    VirtualMachine,
    VirtualMachineScaleSet,
    DedicatedHostGroup,
    DedicatedHost,
    ManagedDisk,
    ArcMachine,
    MaintenanceConfiguration,
    ConfigurationAssignment,
    VirtualMachineAssignment,
    VirtualMachineScaleSetAssignment,
    DedicatedHostAssignment,
    ArcMachineAssignment,
    DynamicScopeAssignment,
    StorageAccount,
    StorageShare,
    ObjectReplicationPolicy,
    ObjectReplication,
    DiskPool,
    DiskPoolManagedDiskAttachment,
    DataShareAccount,
    DataShare,
    DataSet,
}

impl IdKind {
    /// Composite ids and target assignments only have a strict parser.
    pub fn supports_insensitive(self) -> bool {
        !matches!(
            self,
            IdKind::VirtualMachineAssignment
                | IdKind::VirtualMachineScaleSetAssignment
                | IdKind::DedicatedHostAssignment
                | IdKind::ArcMachineAssignment
                | IdKind::ObjectReplication
                | IdKind::DiskPoolManagedDiskAttachment
        )
    }

    fn name(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{self:?}"))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedId {
    pub id: String,
    pub description: String,
}

fn typed<T: ResourceId>(input: &str, insensitive: bool) -> Result<ParsedId, IdError> {
    let id = if insensitive {
        T::parse_insensitively(input)?
    } else {
        T::parse(input)?
    };
    Ok(ParsedId {
        id: id.id(),
        description: id.describe(),
    })
}

/// Ids with no case-insensitive mode: composites and target assignments.
macro_rules! strict {
    ($ty:ty, $input:expr) => {
        <$ty>::parse($input).map(|id| ParsedId {
            id: id.id(),
            description: id.to_string(),
        })
    };
}

pub fn parse(input: &str, kind: IdKind, insensitive: bool) -> Result<ParsedId, IdError> {
    match kind {
        IdKind::Subscription => typed::<SubscriptionId>(input, insensitive),
        IdKind::ResourceGroup => typed::<ResourceGroupId>(input, insensitive),
        IdKind::VirtualMachine => typed::<VirtualMachineId>(input, insensitive),
        IdKind::VirtualMachineScaleSet => typed::<VirtualMachineScaleSetId>(input, insensitive),
        IdKind::DedicatedHostGroup => typed::<DedicatedHostGroupId>(input, insensitive),
        IdKind::DedicatedHost => typed::<DedicatedHostId>(input, insensitive),
        IdKind::ManagedDisk => typed::<ManagedDiskId>(input, insensitive),
        IdKind::ArcMachine => typed::<ArcMachineId>(input, insensitive),
        IdKind::MaintenanceConfiguration => typed::<MaintenanceConfigurationId>(input, insensitive),
        IdKind::ConfigurationAssignment => typed::<ConfigurationAssignmentId>(input, insensitive),
        IdKind::DynamicScopeAssignment => typed::<DynamicScopeAssignmentId>(input, insensitive),
        IdKind::StorageAccount => typed::<StorageAccountId>(input, insensitive),
        IdKind::StorageShare => typed::<StorageShareId>(input, insensitive),
        IdKind::ObjectReplicationPolicy => typed::<ObjectReplicationPolicyId>(input, insensitive),
        IdKind::DiskPool => typed::<DiskPoolId>(input, insensitive),
        IdKind::DataShareAccount => typed::<DataShareAccountId>(input, insensitive),
        IdKind::DataShare => typed::<DataShareId>(input, insensitive),
        IdKind::DataSet => typed::<DataSetId>(input, insensitive),
        IdKind::VirtualMachineAssignment => strict!(VirtualMachineAssignmentId, input),
        IdKind::VirtualMachineScaleSetAssignment => {
            strict!(VirtualMachineScaleSetAssignmentId, input)
        }
        IdKind::DedicatedHostAssignment => strict!(DedicatedHostAssignmentId, input),
        IdKind::ArcMachineAssignment => strict!(ArcMachineAssignmentId, input),
        IdKind::ObjectReplication => strict!(ObjectReplicationId, input),
        IdKind::DiskPoolManagedDiskAttachment => strict!(DiskPoolManagedDiskAttachmentId, input),
    }
}

pub fn handle(input: &str, kind: IdKind, insensitive: bool) -> anyhow::Result<()> {
    if insensitive && !kind.supports_insensitive() {
        anyhow::bail!(
            "--insensitive does not apply to {} ids, they are always parsed strictly",
            kind.name()
        );
    }
    let parsed = parse(input, kind, insensitive)?;
    println!("{}", parsed.description.bold());
    println!("  {}", parsed.id.cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VM: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm1";

    #[test]
    fn test_parse_canonicalises_when_insensitive() {
        let lowered = VM.replace("resourceGroups", "resourcegroups");
        assert!(parse(&lowered, IdKind::VirtualMachine, false).is_err());

        let parsed = parse(&lowered, IdKind::VirtualMachine, true).unwrap();
        assert_eq!(parsed.id, VM);
        assert!(parsed.description.starts_with("Virtual Machine"));
    }

    #[test]
    fn test_parse_target_assignment() {
        let input = format!("{VM}/providers/Microsoft.Maintenance/configurationAssignments/weekly");
        let parsed = parse(&input, IdKind::VirtualMachineAssignment, false).unwrap();
        assert_eq!(parsed.id, input);
        assert!(parsed.description.contains("weekly"));
    }

    #[test]
    fn test_insensitive_is_refused_for_strict_kinds() {
        assert!(IdKind::VirtualMachine.supports_insensitive());
        assert!(!IdKind::ObjectReplication.supports_insensitive());

        let input = format!("{VM}/providers/Microsoft.Maintenance/configurationAssignments/weekly");
        let err = handle(&input, IdKind::VirtualMachineAssignment, true).unwrap_err();
        assert!(err.to_string().contains("virtual-machine-assignment"));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        assert!(parse(VM, IdKind::DedicatedHost, false).is_err());
    }
}

//! Assignments to a fixed target resource
//!
//! The assignment is named after the maintenance configuration and lives
//! under the target's id. Every attribute forces replacement.

use super::{
    ConfigurationAssignment, ConfigurationAssignmentProperties, ConfigurationAssignmentsClient,
    MAINTENANCE_CONFIGURATION_ID, canonical_configuration_id, find_assignment, normalize_location,
    transient_conditions,
};
use armflow_cloud::{OperationContext, Resource, ResourceData, Result};
use armflow_core::id::{
    ArcMachineId, DedicatedHostId, MaintenanceConfigurationId, TargetAssignmentId, VirtualMachineId,
    VirtualMachineScaleSetId,
};
use armflow_core::{ResourceId, validate};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// A resource kind that maintenance configurations can be assigned to
pub trait AssignmentTarget: ResourceId + Clone + Send + Sync + 'static {
    /// Type name of the assignment resource
    const TYPE_NAME: &'static str;

    /// Attribute holding the target's id
    const TARGET_ATTRIBUTE: &'static str;
}

impl AssignmentTarget for VirtualMachineId {
    const TYPE_NAME: &'static str = "maintenance_assignment_virtual_machine";
    const TARGET_ATTRIBUTE: &'static str = "virtual_machine_id";
}

impl AssignmentTarget for VirtualMachineScaleSetId {
    const TYPE_NAME: &'static str = "maintenance_assignment_virtual_machine_scale_set";
    const TARGET_ATTRIBUTE: &'static str = "virtual_machine_scale_set_id";
}

impl AssignmentTarget for DedicatedHostId {
    const TYPE_NAME: &'static str = "maintenance_assignment_dedicated_host";
    const TARGET_ATTRIBUTE: &'static str = "dedicated_host_id";
}

impl AssignmentTarget for ArcMachineId {
    const TYPE_NAME: &'static str = "maintenance_assignment_arc_machine";
    const TARGET_ATTRIBUTE: &'static str = "arc_machine_id";
}

pub struct TargetAssignmentResource<T> {
    client: Arc<dyn ConfigurationAssignmentsClient>,
    target: PhantomData<fn() -> T>,
}

pub type VirtualMachineAssignment = TargetAssignmentResource<VirtualMachineId>;
pub type VirtualMachineScaleSetAssignment = TargetAssignmentResource<VirtualMachineScaleSetId>;
pub type DedicatedHostAssignment = TargetAssignmentResource<DedicatedHostId>;
pub type ArcMachineAssignment = TargetAssignmentResource<ArcMachineId>;

impl<T: AssignmentTarget> TargetAssignmentResource<T> {
    pub fn new(client: Arc<dyn ConfigurationAssignmentsClient>) -> Self {
        Self {
            client,
            target: PhantomData,
        }
    }
}

#[async_trait]
impl<T: AssignmentTarget> Resource for TargetAssignmentResource<T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        validate::no_empty_strings(data.get_str("location").unwrap_or_default(), "location")?;
        validate::resource_id::<MaintenanceConfigurationId>(
            data.require_str(MAINTENANCE_CONFIGURATION_ID)?,
            MAINTENANCE_CONFIGURATION_ID,
        )?;
        validate::resource_id::<T>(data.require_str(T::TARGET_ATTRIBUTE)?, T::TARGET_ATTRIBUTE)?;
        Ok(())
    }

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        self.validate(data)?;

        let target = T::parse(data.require_str(T::TARGET_ATTRIBUTE)?)?;
        let configuration =
            MaintenanceConfigurationId::parse(data.require_str(MAINTENANCE_CONFIGURATION_ID)?)?;
        let location = normalize_location(data.require_str("location")?);

        let id = TargetAssignmentId::new(target, &configuration.maintenance_configuration_name);
        let canonical = id.id();
        let scoped = id.as_scoped();

        let client = self.client.as_ref();
        let scope = id.target_id_raw.as_str();
        let name = id.name.as_str();
        ctx.reconciler
            .ensure_absent(&canonical, T::TYPE_NAME, move || {
                find_assignment(client, scope, name)
            })
            .await?;

        let assignment = ConfigurationAssignment {
            id: None,
            name: Some(id.name.clone()),
            location: Some(location),
            properties: ConfigurationAssignmentProperties {
                maintenance_configuration_id: Some(configuration.id()),
                resource_id: Some(id.target_id_raw.clone()),
                filter: None,
            },
        };

        let body = &assignment;
        let scoped = &scoped;
        let created = ctx
            .reconciler
            .with_classifier(transient_conditions())
            .create(&canonical, move || client.create_or_update(scoped, body))
            .await?;
        info!(id = %canonical, attempts = created.attempts, "assigned maintenance configuration");

        data.set_id(canonical);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = TargetAssignmentId::<T>::parse(data.require_id()?)?;

        let client = self.client.as_ref();
        let scope = id.target_id_raw.as_str();
        let name = id.name.as_str();
        let found = ctx
            .reconciler
            .read(&id.id(), move || find_assignment(client, scope, name))
            .await?;

        let Some(assignment) = found else {
            data.clear_id();
            return Ok(());
        };

        if let Some(location) = assignment.location.as_deref() {
            data.set("location", normalize_location(location))?;
        }
        if let Some(configuration_id) = assignment.properties.maintenance_configuration_id.as_deref() {
            data.set(MAINTENANCE_CONFIGURATION_ID, canonical_configuration_id(configuration_id))?;
        }
        data.set(T::TARGET_ATTRIBUTE, &id.target_id_raw)?;
        Ok(())
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = TargetAssignmentId::<T>::parse(data.require_id()?)?;
        let scoped = id.as_scoped();

        let client = self.client.as_ref();
        let scoped_ref = &scoped;
        ctx.reconciler
            .delete(&id.id(), move || client.delete(scoped_ref))
            .await?;

        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::VM_NOT_READY;
    use crate::maintenance::fake::FakeAssignments;
    use armflow_cloud::{ArmError, Reconciler, RetryConfig, Timeouts};
    use serde_json::{Map, Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const VM: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/resGroup1/providers/Microsoft.Compute/virtualMachines/vm1";
    const CONFIG: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/resGroup1/providers/Microsoft.Maintenance/maintenanceConfigurations/weekly";

    fn context(limit: Duration) -> OperationContext {
        let retry = RetryConfig {
            max_attempts: None,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 1.0,
        };
        let timeouts = Timeouts {
            create: limit,
            read: limit,
            update: limit,
            delete: limit,
        };
        OperationContext {
            reconciler: Reconciler::new(retry, timeouts),
            ..Default::default()
        }
    }

    fn planned() -> ResourceData {
        let Value::Object(attributes) = json!({
            "location": "West Europe",
            "maintenance_configuration_id": CONFIG,
            "virtual_machine_id": VM,
        }) else {
            unreachable!()
        };
        ResourceData::new(attributes)
    }

    fn resource(fake: &Arc<FakeAssignments>) -> VirtualMachineAssignment {
        VirtualMachineAssignment::new(fake.clone())
    }

    #[tokio::test]
    async fn test_create_names_assignment_after_configuration() {
        let fake = Arc::new(FakeAssignments::default());
        let mut data = planned();

        resource(&fake).create(&context(Duration::from_secs(5)), &mut data).await.unwrap();

        assert_eq!(
            data.id(),
            Some(format!("{VM}/providers/Microsoft.Maintenance/configurationAssignments/weekly").as_str())
        );
        assert_eq!(data.get_str("location"), Some("westeurope"));
        assert_eq!(data.get_str("maintenance_configuration_id"), Some(CONFIG));
    }

    #[tokio::test]
    async fn test_create_retries_until_vm_is_ready() {
        let fake = Arc::new(FakeAssignments::failing_first(2));
        let mut data = planned();

        resource(&fake).create(&context(Duration::from_secs(5)), &mut data).await.unwrap();

        assert_eq!(fake.writes.load(Ordering::SeqCst), 3);
        assert!(data.id().is_some());
    }

    #[tokio::test]
    async fn test_create_gives_up_at_timeout() {
        let fake = Arc::new(FakeAssignments::failing_first(u32::MAX));
        let mut data = planned();

        let err = resource(&fake)
            .create(&context(Duration::from_millis(30)), &mut data)
            .await
            .unwrap_err();

        match err {
            ArmError::RetryExhausted { message, .. } => assert!(message.contains(VM_NOT_READY)),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(data.id().is_none());
    }

    #[tokio::test]
    async fn test_create_over_existing_assignment_requires_import() {
        let fake = Arc::new(FakeAssignments::default());
        let ctx = context(Duration::from_secs(5));
        resource(&fake).create(&ctx, &mut planned()).await.unwrap();

        let err = resource(&fake).create(&ctx, &mut planned()).await.unwrap_err();
        assert!(matches!(err, ArmError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_read_keeps_raw_target_casing() {
        let fake = Arc::new(FakeAssignments::default());
        let ctx = context(Duration::from_secs(5));
        let mut data = planned();
        resource(&fake).create(&ctx, &mut data).await.unwrap();

        let lowered = format!(
            "{}/providers/Microsoft.Maintenance/configurationAssignments/weekly",
            VM.replace("resourceGroups", "resourcegroups")
                .replace("Microsoft.Compute", "microsoft.compute")
        );
        let mut echoed = ResourceData::existing(lowered.clone(), Map::new());
        resource(&fake).read(&ctx, &mut echoed).await.unwrap();

        assert_eq!(echoed.id(), Some(lowered.as_str()));
        assert!(echoed.get_str("virtual_machine_id").unwrap().contains("resourcegroups"));
        assert_eq!(echoed.get_str("maintenance_configuration_id"), Some(CONFIG));
    }

    #[tokio::test]
    async fn test_read_after_external_delete_clears_id() {
        let fake = Arc::new(FakeAssignments::default());
        let ctx = context(Duration::from_secs(5));
        let mut data = planned();
        resource(&fake).create(&ctx, &mut data).await.unwrap();

        fake.assignments.lock().unwrap().clear();
        resource(&fake).read(&ctx, &mut data).await.unwrap();
        assert!(data.id().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let fake = Arc::new(FakeAssignments::default());
        let ctx = context(Duration::from_secs(5));
        let mut data = planned();
        resource(&fake).create(&ctx, &mut data).await.unwrap();
        let id = data.id().unwrap().to_string();

        resource(&fake).delete(&ctx, &mut data).await.unwrap();
        assert!(data.id().is_none());

        let mut again = ResourceData::existing(id, Map::new());
        resource(&fake).delete(&ctx, &mut again).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_is_refused() {
        let fake = Arc::new(FakeAssignments::default());
        let mut data = planned();
        let err = resource(&fake)
            .update(&context(Duration::from_secs(5)), &mut data)
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::UpdateNotSupported(name) if name == "maintenance_assignment_virtual_machine"));
    }

    #[test]
    fn test_validate_rejects_wrong_target_kind() {
        let fake = Arc::new(FakeAssignments::default());
        let Value::Object(attributes) = json!({
            "location": "westeurope",
            "maintenance_configuration_id": CONFIG,
            "dedicated_host_id": VM,
        }) else {
            unreachable!()
        };

        let host = DedicatedHostAssignment::new(fake);
        let err = host.validate(&ResourceData::new(attributes)).unwrap_err();
        assert!(matches!(err, ArmError::Validation(e) if e.key == "dedicated_host_id"));
    }
}

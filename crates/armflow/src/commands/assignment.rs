//! Maintenance assignments against the live API, recorded in the state file

use crate::context::AppContext;
use armflow_cloud::{Resource, ResourceData, ResourceState, ResourceStatus};
use armflow_core::id::{ArcMachineId, DedicatedHostId, VirtualMachineId, VirtualMachineScaleSetId};
use armflow_services::maintenance::{
    ArcMachineAssignment, ArmConfigurationAssignments, AssignmentTarget, ConfigurationAssignmentsClient,
    DedicatedHostAssignment, VirtualMachineAssignment, VirtualMachineScaleSetAssignment,
};
use clap::ValueEnum;
use colored::Colorize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    VirtualMachine,
    VirtualMachineScaleSet,
    DedicatedHost,
    ArcMachine,
}

impl TargetKind {
    fn resource(self, app: &AppContext) -> Box<dyn Resource> {
        let client: Arc<dyn ConfigurationAssignmentsClient> =
            Arc::new(ArmConfigurationAssignments::new(app.client.clone()));
        match self {
            TargetKind::VirtualMachine => Box::new(VirtualMachineAssignment::new(client)),
            TargetKind::VirtualMachineScaleSet => Box::new(VirtualMachineScaleSetAssignment::new(client)),
            TargetKind::DedicatedHost => Box::new(DedicatedHostAssignment::new(client)),
            TargetKind::ArcMachine => Box::new(ArcMachineAssignment::new(client)),
        }
    }

    /// Attribute holding the target id
    fn target_attribute(self) -> &'static str {
        match self {
            TargetKind::VirtualMachine => VirtualMachineId::TARGET_ATTRIBUTE,
            TargetKind::VirtualMachineScaleSet => VirtualMachineScaleSetId::TARGET_ATTRIBUTE,
            TargetKind::DedicatedHost => DedicatedHostId::TARGET_ATTRIBUTE,
            TargetKind::ArcMachine => ArcMachineId::TARGET_ATTRIBUTE,
        }
    }
}

fn attributes(kind: TargetKind, target: &str, configuration: &str, location: &str) -> Map<String, Value> {
    let mut attributes = Map::new();
    attributes.insert("location".to_string(), json!(location));
    attributes.insert("maintenance_configuration_id".to_string(), json!(configuration));
    attributes.insert(kind.target_attribute().to_string(), json!(target));
    attributes
}

pub async fn create(
    app: &AppContext,
    kind: TargetKind,
    target: &str,
    configuration: &str,
    location: &str,
) -> anyhow::Result<()> {
    let resource = kind.resource(app);
    let mut data = ResourceData::new(attributes(kind, target, configuration, location));
    resource.validate(&data)?;

    let lock = app.state.acquire_lock().await?;
    let mut state = app.state.load().await?;

    resource.create(&app.operation, &mut data).await?;
    let id = data.require_id()?.to_string();

    state.upsert(
        ResourceState::new(&id, resource.type_name())
            .with_status(ResourceStatus::Ready)
            .with_attributes(data.into_attributes()),
    );
    app.state.save(&state).await?;
    lock.release().await?;

    info!(id = %id, "assignment recorded");
    println!("{} {}", "✓ Created".green(), id.cyan());
    Ok(())
}

pub async fn read(app: &AppContext, kind: TargetKind, id: &str) -> anyhow::Result<()> {
    let resource = kind.resource(app);

    let lock = app.state.acquire_lock().await?;
    let mut state = app.state.load().await?;
    let prior = state.get(id).map(|s| s.attributes.clone()).unwrap_or_default();

    let mut data = ResourceData::existing(id, prior);
    resource.read(&app.operation, &mut data).await?;

    if data.id().is_none() {
        state.remove(id);
        app.state.save(&state).await?;
        lock.release().await?;
        println!("{} {}", "✗ Gone".yellow(), id);
        return Ok(());
    }

    let attributes = data.into_attributes();
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    match state.resources.get_mut(id) {
        Some(existing) => existing.refresh(attributes),
        None => state.upsert(
            ResourceState::new(id, resource.type_name())
                .with_status(ResourceStatus::Ready)
                .with_attributes(attributes),
        ),
    }
    app.state.save(&state).await?;
    lock.release().await?;
    Ok(())
}

pub async fn delete(app: &AppContext, kind: TargetKind, id: &str) -> anyhow::Result<()> {
    let resource = kind.resource(app);

    let lock = app.state.acquire_lock().await?;
    let mut state = app.state.load().await?;

    let mut data = ResourceData::existing(id, Map::new());
    resource.delete(&app.operation, &mut data).await?;

    state.remove(id);
    app.state.save(&state).await?;
    lock.release().await?;

    println!("{} {}", "✓ Deleted".green(), id.cyan());
    Ok(())
}

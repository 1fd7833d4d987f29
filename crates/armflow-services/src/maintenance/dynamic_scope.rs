//! Dynamic scope assignments
//!
//! Held at subscription level, they apply a maintenance configuration to
//! every machine matched by a filter. Only the filter can change in place,
//! and a change replaces the whole filter.

use super::{
    ConfigurationAssignment, ConfigurationAssignmentProperties, ConfigurationAssignmentsClient,
    DynamicScopeFilter, MAINTENANCE_CONFIGURATION_ID, TagOperator, canonical_configuration_id,
    transient_conditions,
};
use armflow_cloud::{ArmError, OperationContext, Resource, ResourceData, Result};
use armflow_core::id::{DynamicScopeAssignmentId, MaintenanceConfigurationId};
use armflow_core::{ResourceId, ValidationError, validate};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

const TYPE_NAME: &str = "maintenance_assignment_dynamic_scope";

pub struct DynamicScopeAssignment {
    client: Arc<dyn ConfigurationAssignmentsClient>,
}

impl DynamicScopeAssignment {
    pub fn new(client: Arc<dyn ConfigurationAssignmentsClient>) -> Self {
        Self { client }
    }
}

fn filter_block(data: &ResourceData) -> Option<&Value> {
    match data.attributes().get("filter")? {
        Value::Array(items) => items.first(),
        block @ Value::Object(_) => Some(block),
        _ => None,
    }
}

fn parse_filter(data: &ResourceData) -> Result<DynamicScopeFilter> {
    let block = filter_block(data).ok_or_else(|| ArmError::MissingAttribute("filter".to_string()))?;
    if let Some(operator) = block.get("tag_filter").and_then(Value::as_str) {
        validate::string_in_slice(operator, "filter.0.tag_filter", &TagOperator::VALUES, false)?;
    }
    let filter: DynamicScopeFilter = serde_json::from_value(block.clone())?;
    if !filter.has_any_dimension() {
        return Err(ValidationError::new(
            "filter",
            "at least one of `locations`, `os_types`, `resource_groups`, `resource_types` or `tags` must be set",
        )
        .into());
    }
    Ok(filter)
}

#[async_trait]
impl Resource for DynamicScopeAssignment {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        validate::maintenance_configuration_name(data.require_str("name")?, "name")?;
        validate::resource_id::<MaintenanceConfigurationId>(
            data.require_str(MAINTENANCE_CONFIGURATION_ID)?,
            MAINTENANCE_CONFIGURATION_ID,
        )?;
        parse_filter(data)?;
        Ok(())
    }

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        self.validate(data)?;

        let id = DynamicScopeAssignmentId::new(&ctx.subscription_id, data.require_str("name")?);
        let configuration =
            MaintenanceConfigurationId::parse(data.require_str(MAINTENANCE_CONFIGURATION_ID)?)?;
        let filter = parse_filter(data)?;

        let canonical = id.id();
        let scoped = id.as_scoped();
        let client = self.client.as_ref();
        let scoped_ref = &scoped;

        ctx.reconciler
            .ensure_absent(&canonical, TYPE_NAME, move || client.get(scoped_ref))
            .await?;

        let assignment = ConfigurationAssignment {
            id: None,
            name: Some(id.configuration_assignment_name.clone()),
            location: Some("global".to_string()),
            properties: ConfigurationAssignmentProperties {
                maintenance_configuration_id: Some(configuration.id()),
                resource_id: Some(scoped.scope.clone()),
                filter: Some(filter.expand()),
            },
        };

        let body = &assignment;
        ctx.reconciler
            .with_classifier(transient_conditions())
            .create(&canonical, move || client.create_or_update(scoped_ref, body))
            .await?;

        data.set_id(canonical);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = DynamicScopeAssignmentId::parse(data.require_id()?)?;
        let scoped = id.as_scoped();
        let client = self.client.as_ref();
        let scoped_ref = &scoped;

        let Some(assignment) = ctx
            .reconciler
            .read(&id.id(), move || client.get(scoped_ref))
            .await?
        else {
            data.clear_id();
            return Ok(());
        };

        data.set("name", &id.configuration_assignment_name)?;
        if let Some(configuration_id) = assignment.properties.maintenance_configuration_id.as_deref() {
            data.set(MAINTENANCE_CONFIGURATION_ID, canonical_configuration_id(configuration_id))?;
        }
        let filter = assignment
            .properties
            .filter
            .as_ref()
            .map(DynamicScopeFilter::flatten)
            .into_iter()
            .collect::<Vec<_>>();
        data.set("filter", filter)?;
        Ok(())
    }

    async fn update(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let changed = data.changed_keys();
        if let Some(key) = changed
            .iter()
            .find(|key| ["name", MAINTENANCE_CONFIGURATION_ID].contains(*key))
        {
            return Err(ArmError::UpdateNotSupported(format!("{TYPE_NAME} `{key}`")));
        }
        debug!(?changed, "planned changes");
        let filter_changed = changed.contains(&"filter");

        let id = DynamicScopeAssignmentId::parse(data.require_id()?)?;
        if !filter_changed {
            debug!(id = %id.id(), "no filter change");
            return self.read(ctx, data).await;
        }

        let filter = parse_filter(data)?;
        let canonical = id.id();
        let scoped = id.as_scoped();
        let client = self.client.as_ref();
        let scoped_ref = &scoped;

        let mut assignment = ctx
            .reconciler
            .update(&canonical, move || client.get(scoped_ref))
            .await?;
        assignment.properties.filter = Some(filter.expand());

        let body = &assignment;
        ctx.reconciler
            .update(&canonical, move || client.create_or_update(scoped_ref, body))
            .await?;

        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = DynamicScopeAssignmentId::parse(data.require_id()?)?;
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
    use crate::maintenance::fake::FakeAssignments;
    use serde_json::{Map, json};

    const SUB: &str = "00000000-0000-0000-0000-000000000000";
    const CONFIG: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Maintenance/maintenanceConfigurations/weekly";

    fn context() -> OperationContext {
        OperationContext {
            subscription_id: SUB.to_string(),
            ..Default::default()
        }
    }

    fn attributes(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn planned(filter: Value) -> ResourceData {
        ResourceData::new(attributes(json!({
            "name": "linux-prod",
            "maintenance_configuration_id": CONFIG,
            "filter": [filter],
        })))
    }

    #[tokio::test]
    async fn test_create_and_read_back_filter() {
        let fake = Arc::new(FakeAssignments::default());
        let resource = DynamicScopeAssignment::new(fake.clone());
        let mut data = planned(json!({
            "locations": ["westeurope"],
            "os_types": ["Linux"],
            "tags": [{"tag": "env", "values": ["prod"]}],
        }));

        resource.create(&context(), &mut data).await.unwrap();

        assert_eq!(
            data.id(),
            Some("/subscriptions/00000000-0000-0000-0000-000000000000/providers/Microsoft.Maintenance/configurationAssignments/linux-prod")
        );
        let filters: Vec<DynamicScopeFilter> = data.get("filter").unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].os_types, vec!["Linux"]);
        assert_eq!(filters[0].tag_filter, TagOperator::Any);
    }

    #[tokio::test]
    async fn test_update_replaces_filter_wholesale() {
        let fake = Arc::new(FakeAssignments::default());
        let resource = DynamicScopeAssignment::new(fake.clone());
        let ctx = context();

        let mut data = planned(json!({
            "locations": ["westeurope"],
            "resource_groups": ["rg1"],
        }));
        resource.create(&ctx, &mut data).await.unwrap();

        let id = data.id().unwrap().to_string();
        let prior = data.clone().into_attributes();
        let mut planned_change = ResourceData::planned(
            id.clone(),
            prior,
            attributes(json!({"filter": [{"locations": ["northeurope"], "tag_filter": "All"}]})),
        );
        resource.update(&ctx, &mut planned_change).await.unwrap();

        let stored = fake
            .stored(&DynamicScopeAssignmentId::parse(&id).unwrap().as_scoped())
            .unwrap();
        let filter = DynamicScopeFilter::flatten(stored.properties.filter.as_ref().unwrap());
        assert_eq!(filter.locations, vec!["northeurope"]);
        assert!(filter.resource_groups.is_empty());
        assert_eq!(filter.tag_filter, TagOperator::All);
    }

    #[tokio::test]
    async fn test_identity_fields_cannot_change() {
        let fake = Arc::new(FakeAssignments::default());
        let resource = DynamicScopeAssignment::new(fake);
        let mut data = ResourceData::planned(
            "/subscriptions/sub/providers/Microsoft.Maintenance/configurationAssignments/a",
            attributes(json!({"name": "a"})),
            attributes(json!({"name": "b"})),
        );
        let err = resource.update(&context(), &mut data).await.unwrap_err();
        assert!(matches!(err, ArmError::UpdateNotSupported(_)));
    }

    #[test]
    fn test_validate_requires_a_dimension() {
        let resource = DynamicScopeAssignment::new(Arc::new(FakeAssignments::default()));

        let empty = planned(json!({"tag_filter": "Any"}));
        assert!(matches!(resource.validate(&empty), Err(ArmError::Validation(e)) if e.key == "filter"));

        let bad_operator = planned(json!({"locations": ["eastus"], "tag_filter": "any"}));
        assert!(matches!(
            resource.validate(&bad_operator),
            Err(ArmError::Validation(e)) if e.key == "filter.0.tag_filter"
        ));

        let ok = planned(json!({"resource_types": ["Microsoft.Compute/virtualMachines"]}));
        assert!(resource.validate(&ok).is_ok());
    }

    #[tokio::test]
    async fn test_read_gone_and_delete_gone() {
        let fake = Arc::new(FakeAssignments::default());
        let resource = DynamicScopeAssignment::new(fake);
        let id = "/subscriptions/00000000-0000-0000-0000-000000000000/providers/Microsoft.Maintenance/configurationAssignments/missing";

        let mut data = ResourceData::existing(id, Map::new());
        resource.read(&context(), &mut data).await.unwrap();
        assert!(data.id().is_none());

        let mut data = ResourceData::existing(id, Map::new());
        resource.delete(&context(), &mut data).await.unwrap();
        assert!(data.id().is_none());
    }
}

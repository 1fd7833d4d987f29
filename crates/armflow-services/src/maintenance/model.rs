//! Configuration assignment models
//!
//! `ConfigurationAssignment` mirrors the ARM wire shape. `DynamicScopeFilter`
//! is the configuration-side view of a filter, with snake_case keys and the
//! tag predicate as a list of `{tag, values}` blocks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub properties: ConfigurationAssignmentProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationAssignmentProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_configuration_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<AssignmentFilterProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFilterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_groups: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_settings: Option<TagSettingsProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSettingsProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_operator: Option<TagOperator>,
}

/// How tag predicates combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagOperator {
    #[default]
    Any,
    All,
}

impl TagOperator {
    pub const VALUES: [&'static str; 2] = ["Any", "All"];
}

/// One tag and its accepted values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValues {
    pub tag: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Predicate selecting the machines a dynamic scope assignment applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicScopeFilter {
    pub locations: Vec<String>,
    pub os_types: Vec<String>,
    pub resource_groups: Vec<String>,
    pub resource_types: Vec<String>,
    pub tag_filter: TagOperator,
    pub tags: Vec<TagValues>,
}

impl DynamicScopeFilter {
    /// At least one of the five dimensions must select something.
    pub fn has_any_dimension(&self) -> bool {
        !self.locations.is_empty()
            || !self.os_types.is_empty()
            || !self.resource_groups.is_empty()
            || !self.resource_types.is_empty()
            || !self.tags.is_empty()
    }

    /// Wire form. Every dimension is sent, empty or not, so an update
    /// replaces the whole filter and clears dropped dimensions.
    pub fn expand(&self) -> AssignmentFilterProperties {
        let tags = self
            .tags
            .iter()
            .map(|t| (t.tag.clone(), t.values.clone()))
            .collect();

        AssignmentFilterProperties {
            locations: Some(self.locations.clone()),
            os_types: Some(self.os_types.clone()),
            resource_groups: Some(self.resource_groups.clone()),
            resource_types: Some(self.resource_types.clone()),
            tag_settings: Some(TagSettingsProperties {
                tags: Some(tags),
                filter_operator: Some(self.tag_filter),
            }),
        }
    }

    pub fn flatten(input: &AssignmentFilterProperties) -> Self {
        let tag_settings = input.tag_settings.clone().unwrap_or_default();
        Self {
            locations: input.locations.clone().unwrap_or_default(),
            os_types: input.os_types.clone().unwrap_or_default(),
            resource_groups: input.resource_groups.clone().unwrap_or_default(),
            resource_types: input.resource_types.clone().unwrap_or_default(),
            tag_filter: tag_settings.filter_operator.unwrap_or_default(),
            tags: tag_settings
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|(tag, values)| TagValues { tag, values })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignment_wire_shape() {
        let assignment: ConfigurationAssignment = serde_json::from_value(json!({
            "id": "/subscriptions/sub/providers/Microsoft.Maintenance/configurationAssignments/a1",
            "name": "a1",
            "location": "global",
            "properties": {
                "maintenanceConfigurationId": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Maintenance/maintenanceConfigurations/c1",
                "filter": {
                    "locations": ["westeurope"],
                    "tagSettings": {"tags": {"env": ["prod"]}, "filterOperator": "All"}
                }
            }
        }))
        .unwrap();

        let filter = DynamicScopeFilter::flatten(assignment.properties.filter.as_ref().unwrap());
        assert_eq!(filter.locations, vec!["westeurope"]);
        assert!(filter.os_types.is_empty());
        assert_eq!(filter.tag_filter, TagOperator::All);
        assert_eq!(
            filter.tags,
            vec![TagValues {
                tag: "env".to_string(),
                values: vec!["prod".to_string()]
            }]
        );
    }

    #[test]
    fn test_expand_sends_every_dimension() {
        let filter = DynamicScopeFilter {
            os_types: vec!["Linux".to_string()],
            ..Default::default()
        };
        let wire = serde_json::to_value(filter.expand()).unwrap();
        assert_eq!(
            wire,
            json!({
                "locations": [],
                "osTypes": ["Linux"],
                "resourceGroups": [],
                "resourceTypes": [],
                "tagSettings": {"tags": {}, "filterOperator": "Any"}
            })
        );
    }

    #[test]
    fn test_has_any_dimension() {
        assert!(!DynamicScopeFilter::default().has_any_dimension());
        let tagged = DynamicScopeFilter {
            tags: vec![TagValues {
                tag: "env".to_string(),
                values: vec![],
            }],
            ..Default::default()
        };
        assert!(tagged.has_any_dimension());
    }

    #[test]
    fn test_tag_filter_defaults_to_any() {
        let filter: DynamicScopeFilter =
            serde_json::from_value(json!({"locations": ["eastus"]})).unwrap();
        assert_eq!(filter.tag_filter, TagOperator::Any);
    }
}

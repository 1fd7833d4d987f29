//! Resource lifecycle surface
//!
//! A resource implementation receives the desired attributes in a
//! [`ResourceData`] and the shared [`OperationContext`], and records the
//! outcome back into the data: the canonical id after create, refreshed
//! attributes after read, or a cleared id when the object is gone.

use crate::error::{ArmError, Result};
use crate::reconciler::Reconciler;
use armflow_config::UserFeatures;
use armflow_core::Environment;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Shared, read-only context for every operation
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    pub subscription_id: String,
    pub reconciler: Reconciler,
    pub features: UserFeatures,
    pub environment: Environment,
}

/// Attribute bag for one resource during one operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Map<String, Value>,
    prior: Map<String, Value>,
}

impl ResourceData {
    /// Data for a resource about to be created
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
            prior: Map::new(),
        }
    }

    /// Data for an existing resource; `attributes` are also the prior values
    pub fn existing(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            prior: attributes.clone(),
            attributes,
        }
    }

    /// Existing resource with planned changes applied on top
    pub fn planned(id: impl Into<String>, prior: Map<String, Value>, planned: Map<String, Value>) -> Self {
        let mut attributes = prior.clone();
        attributes.extend(planned);
        Self {
            id: Some(id.into()),
            attributes,
            prior,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn require_id(&self) -> Result<&str> {
        self.id().ok_or_else(|| ArmError::MissingAttribute("id".to_string()))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone so it is dropped from state.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| ArmError::MissingAttribute(key.to_string()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        self.attributes.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Whether `key` differs from its prior value
    pub fn has_change(&self, key: &str) -> bool {
        self.attributes.get(key) != self.prior.get(key)
    }

    /// Attribute keys whose value differs from the prior state
    pub fn changed_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .attributes
            .keys()
            .chain(self.prior.keys())
            .map(String::as_str)
            .filter(|key| self.has_change(key))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

/// Lifecycle of one resource type
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name as used in configuration, e.g. `maintenance_assignment_virtual_machine`
    fn type_name(&self) -> &'static str;

    /// Check attributes before any remote call is made
    fn validate(&self, data: &ResourceData) -> Result<()>;

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()>;

    /// Refresh attributes; clears the id when the remote object is gone
    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()>;

    /// Apply in-place changes. Resources whose attributes all force
    /// replacement keep the default, which refuses.
    async fn update(&self, _ctx: &OperationContext, _data: &mut ResourceData) -> Result<()> {
        Err(ArmError::UpdateNotSupported(self.type_name().to_string()))
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_has_change() {
        let data = ResourceData::planned(
            "/x",
            attrs(json!({"location": "westeurope", "filter": {"locations": ["a"]}})),
            attrs(json!({"filter": {"locations": ["b"]}})),
        );

        assert!(data.has_change("filter"));
        assert!(!data.has_change("location"));
        assert_eq!(data.changed_keys(), vec!["filter"]);
    }

    #[test]
    fn test_getters() {
        let mut data = ResourceData::new(attrs(json!({"name": "a1", "empty": "", "count": 3})));
        assert_eq!(data.get_str("name"), Some("a1"));
        assert_eq!(data.get_str("empty"), None);
        assert_eq!(data.get::<u32>("count"), Some(3));
        assert!(matches!(data.require_str("missing"), Err(ArmError::MissingAttribute(k)) if k == "missing"));

        data.set("count", 4).unwrap();
        assert_eq!(data.get::<u32>("count"), Some(4));
    }

    #[test]
    fn test_clear_id() {
        let mut data = ResourceData::existing("/x", Map::new());
        assert_eq!(data.id(), Some("/x"));
        data.clear_id();
        assert_eq!(data.id(), None);
        assert!(data.require_id().is_err());
    }
}

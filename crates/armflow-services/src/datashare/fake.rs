//! In-memory dataset API for tests

use super::DataSetsClient;
use armflow_cloud::RemoteError;
use armflow_core::ResourceId;
use armflow_core::id::DataSetId;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeDataSets {
    pub data_sets: Mutex<BTreeMap<String, Value>>,
}

impl FakeDataSets {
    /// Store `body` as the API would return it, with id, name and dataSetId filled in.
    pub fn insert(&self, id: &DataSetId, mut body: Value) -> Value {
        body["id"] = json!(id.id());
        body["name"] = json!(id.data_set_name);
        body["properties"]["dataSetId"] = json!("00000000-1111-2222-3333-444444444444");
        self.data_sets
            .lock()
            .unwrap()
            .insert(id.id().to_lowercase(), body.clone());
        body
    }
}

#[async_trait]
impl DataSetsClient for FakeDataSets {
    async fn get(&self, id: &DataSetId) -> Result<Value, RemoteError> {
        self.data_sets
            .lock()
            .unwrap()
            .get(&id.id().to_lowercase())
            .cloned()
            .ok_or_else(|| RemoteError::not_found(format!("{id} was not found")))
    }

    async fn create(&self, id: &DataSetId, body: &Value) -> Result<Value, RemoteError> {
        Ok(self.insert(id, body.clone()))
    }

    async fn delete(&self, id: &DataSetId) -> Result<(), RemoteError> {
        self.data_sets
            .lock()
            .unwrap()
            .remove(&id.id().to_lowercase())
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("{id} was not found")))
    }
}

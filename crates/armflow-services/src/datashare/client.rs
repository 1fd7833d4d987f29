//! Data Share dataset API
//!
//! Bodies are exchanged as raw JSON; [`DataSet::from_arm`](super::DataSet::from_arm)
//! decides which variant they hold.

use armflow_cloud::{ArmClient, RemoteError};
use armflow_core::ResourceId;
use armflow_core::id::DataSetId;
use async_trait::async_trait;
use serde_json::Value;

pub const API_VERSION: &str = "2019-11-01";

#[async_trait]
pub trait DataSetsClient: Send + Sync {
    async fn get(&self, id: &DataSetId) -> Result<Value, RemoteError>;

    async fn create(&self, id: &DataSetId, body: &Value) -> Result<Value, RemoteError>;

    async fn delete(&self, id: &DataSetId) -> Result<(), RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ArmDataSets {
    client: ArmClient,
}

impl ArmDataSets {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSetsClient for ArmDataSets {
    async fn get(&self, id: &DataSetId) -> Result<Value, RemoteError> {
        self.client.get(&id.id(), API_VERSION).await
    }

    async fn create(&self, id: &DataSetId, body: &Value) -> Result<Value, RemoteError> {
        self.client.put(&id.id(), API_VERSION, body).await
    }

    async fn delete(&self, id: &DataSetId) -> Result<(), RemoteError> {
        self.client.delete(&id.id(), API_VERSION).await
    }
}

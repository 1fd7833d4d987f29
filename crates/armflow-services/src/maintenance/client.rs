//! Configuration assignment API

use super::model::ConfigurationAssignment;
use armflow_cloud::{ArmClient, RemoteError};
use armflow_core::ResourceId;
use armflow_core::id::ConfigurationAssignmentId;
use async_trait::async_trait;

pub const API_VERSION: &str = "2023-04-01";

#[async_trait]
pub trait ConfigurationAssignmentsClient: Send + Sync {
    async fn get(&self, id: &ConfigurationAssignmentId) -> Result<ConfigurationAssignment, RemoteError>;

    /// All assignments attached to `scope`
    async fn list_for_scope(&self, scope: &str) -> Result<Vec<ConfigurationAssignment>, RemoteError>;

    async fn create_or_update(
        &self,
        id: &ConfigurationAssignmentId,
        assignment: &ConfigurationAssignment,
    ) -> Result<ConfigurationAssignment, RemoteError>;

    async fn delete(&self, id: &ConfigurationAssignmentId) -> Result<(), RemoteError>;
}

/// [`ConfigurationAssignmentsClient`] over the Resource Manager REST API
#[derive(Debug, Clone)]
pub struct ArmConfigurationAssignments {
    client: ArmClient,
}

impl ArmConfigurationAssignments {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigurationAssignmentsClient for ArmConfigurationAssignments {
    async fn get(&self, id: &ConfigurationAssignmentId) -> Result<ConfigurationAssignment, RemoteError> {
        self.client.get(&id.id(), API_VERSION).await
    }

    async fn list_for_scope(&self, scope: &str) -> Result<Vec<ConfigurationAssignment>, RemoteError> {
        let path = format!(
            "{}/providers/Microsoft.Maintenance/configurationAssignments",
            scope.trim_end_matches('/')
        );
        self.client.list(&path, API_VERSION).await
    }

    async fn create_or_update(
        &self,
        id: &ConfigurationAssignmentId,
        assignment: &ConfigurationAssignment,
    ) -> Result<ConfigurationAssignment, RemoteError> {
        self.client.put(&id.id(), API_VERSION, assignment).await
    }

    async fn delete(&self, id: &ConfigurationAssignmentId) -> Result<(), RemoteError> {
        self.client.delete(&id.id(), API_VERSION).await
    }
}

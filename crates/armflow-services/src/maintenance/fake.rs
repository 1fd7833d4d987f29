//! In-memory assignment API for tests

use super::{ConfigurationAssignment, ConfigurationAssignmentsClient, VM_NOT_READY};
use armflow_cloud::RemoteError;
use armflow_core::ResourceId;
use armflow_core::id::ConfigurationAssignmentId;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

const SUFFIX: &str = "/providers/microsoft.maintenance/configurationassignments/";

/// Stores assignments keyed by lower-cased id and echoes scopes back
/// lower-cased, as the real API does.
#[derive(Default)]
pub(crate) struct FakeAssignments {
    pub assignments: Mutex<BTreeMap<String, ConfigurationAssignment>>,
    /// Number of upcoming writes that fail with the VM-not-ready message
    pub transient_failures: AtomicU32,
    pub writes: AtomicU32,
}

impl FakeAssignments {
    pub fn failing_first(writes: u32) -> Self {
        let fake = Self::default();
        fake.transient_failures.store(writes, Ordering::SeqCst);
        fake
    }

    pub fn insert(&self, id: &ConfigurationAssignmentId, assignment: ConfigurationAssignment) {
        let key = id.id().to_lowercase();
        let stored = ConfigurationAssignment {
            id: Some(key.clone()),
            name: Some(id.configuration_assignment_name.clone()),
            ..assignment
        };
        self.assignments.lock().unwrap().insert(key, stored);
    }

    pub fn stored(&self, id: &ConfigurationAssignmentId) -> Option<ConfigurationAssignment> {
        self.assignments
            .lock()
            .unwrap()
            .get(&id.id().to_lowercase())
            .cloned()
    }
}

#[async_trait]
impl ConfigurationAssignmentsClient for FakeAssignments {
    async fn get(&self, id: &ConfigurationAssignmentId) -> Result<ConfigurationAssignment, RemoteError> {
        self.stored(id)
            .ok_or_else(|| RemoteError::not_found(format!("{id} was not found")))
    }

    async fn list_for_scope(&self, scope: &str) -> Result<Vec<ConfigurationAssignment>, RemoteError> {
        let prefix = format!("{}{}", scope.to_lowercase(), SUFFIX);
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && !key[prefix.len()..].contains('/'))
            .map(|(_, a)| a.clone())
            .collect())
    }

    async fn create_or_update(
        &self,
        id: &ConfigurationAssignmentId,
        assignment: &ConfigurationAssignment,
    ) -> Result<ConfigurationAssignment, RemoteError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RemoteError::new(400, "BadRequest", VM_NOT_READY));
        }
        self.insert(id, assignment.clone());
        self.get(id).await
    }

    async fn delete(&self, id: &ConfigurationAssignmentId) -> Result<(), RemoteError> {
        self.assignments
            .lock()
            .unwrap()
            .remove(&id.id().to_lowercase())
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("{id} was not found")))
    }
}

//! Blob storage datasets
//!
//! One resource covers three dataset kinds: a single blob (`file_path`), a
//! folder prefix (`folder_path`) or the whole container. Every attribute
//! forces replacement.

use super::model::{
    BlobFolderProperties, BlobProperties, ContainerProperties, DataSet, DataSetKind, StorageLocation,
};
use super::DataSetsClient;
use armflow_cloud::{ArmError, Operation, OperationContext, Resource, ResourceData, Result};
use armflow_core::id::{DataSetId, DataShareId};
use armflow_core::{ResourceId, ValidationError, validate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const TYPE_NAME: &str = "data_share_dataset_blob_storage";
const DATA_SHARE_ID: &str = "data_share_id";

/// The `storage_account` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAccountBlock {
    pub name: String,
    pub resource_group_name: String,
    pub subscription_id: String,
}

impl From<&StorageLocation> for StorageAccountBlock {
    fn from(location: &StorageLocation) -> Self {
        Self {
            name: location.storage_account_name.clone(),
            resource_group_name: location.resource_group.clone(),
            subscription_id: location.subscription_id.clone(),
        }
    }
}

impl From<StorageAccountBlock> for StorageLocation {
    fn from(block: StorageAccountBlock) -> Self {
        Self {
            subscription_id: block.subscription_id,
            resource_group: block.resource_group_name,
            storage_account_name: block.name,
        }
    }
}

pub struct BlobStorageDataSet {
    client: Arc<dyn DataSetsClient>,
}

impl BlobStorageDataSet {
    pub fn new(client: Arc<dyn DataSetsClient>) -> Self {
        Self { client }
    }
}

fn storage_account(data: &ResourceData) -> Result<StorageAccountBlock> {
    let block = match data.attributes().get("storage_account") {
        Some(Value::Array(items)) => items.first(),
        Some(block @ Value::Object(_)) => Some(block),
        _ => None,
    }
    .ok_or_else(|| ArmError::MissingAttribute("storage_account".to_string()))?;
    Ok(serde_json::from_value(block.clone())?)
}

/// Build the dataset the attributes describe.
fn desired(data: &ResourceData) -> Result<DataSet> {
    let container_name = data.require_str("container_name")?.to_string();
    let storage = StorageLocation::from(storage_account(data)?);

    let data_set = match (data.get_str("file_path"), data.get_str("folder_path")) {
        (Some(file_path), None) => DataSet::blob(BlobProperties {
            container_name,
            file_path: file_path.to_string(),
            storage,
        }),
        (None, Some(prefix)) => DataSet::blob_folder(BlobFolderProperties {
            container_name,
            prefix: prefix.to_string(),
            storage,
        }),
        (None, None) => DataSet::container(ContainerProperties {
            container_name,
            storage,
        }),
        (Some(_), Some(_)) => {
            return Err(ValidationError::new(
                "file_path",
                "conflicts with `folder_path`, only one may be set",
            )
            .into());
        }
    };
    Ok(data_set)
}

#[async_trait]
impl Resource for BlobStorageDataSet {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        validate::data_set_name(data.require_str("name")?, "name")?;
        validate::resource_id::<DataShareId>(data.require_str(DATA_SHARE_ID)?, DATA_SHARE_ID)?;
        validate::no_empty_strings(data.require_str("container_name")?, "container_name")?;

        let account = storage_account(data)?;
        validate::storage_account_name(&account.name, "storage_account.0.name")?;
        validate::resource_group_name(
            &account.resource_group_name,
            "storage_account.0.resource_group_name",
        )?;
        validate::is_uuid(&account.subscription_id, "storage_account.0.subscription_id")?;

        desired(data)?;
        Ok(())
    }

    async fn create(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        self.validate(data)?;

        let share = DataShareId::parse(data.require_str(DATA_SHARE_ID)?)?;
        let id = DataSetId::new(
            &share.subscription_id,
            &share.resource_group_name,
            &share.account_name,
            &share.share_name,
            data.require_str("name")?,
        );
        let canonical = id.id();
        let body = desired(data)?
            .to_arm()
            .map_err(|e| ArmError::payload(Operation::Create, &canonical, e))?;

        let client = self.client.as_ref();
        let id_ref = &id;
        ctx.reconciler
            .ensure_absent(&canonical, TYPE_NAME, move || client.get(id_ref))
            .await?;

        let body_ref = &body;
        let created = ctx
            .reconciler
            .create(&canonical, move || client.create(id_ref, body_ref))
            .await?;
        info!(id = %canonical, kind = %body["kind"], attempts = created.attempts, "created dataset");

        data.set_id(canonical);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = DataSetId::parse_insensitively(data.require_id()?)?;
        let canonical = id.id();

        let client = self.client.as_ref();
        let id_ref = &id;
        let Some(body) = ctx
            .reconciler
            .read(&canonical, move || client.get(id_ref))
            .await?
        else {
            data.clear_id();
            return Ok(());
        };

        let data_set =
            DataSet::from_arm(body).map_err(|e| ArmError::payload(Operation::Read, &canonical, e))?;
        let (container_name, storage, file_path, folder_path) = match (data_set.kind, &data_set) {
            (DataSetKind::Blob, DataSet { blob: Some(p), .. }) => {
                (&p.container_name, &p.storage, Some(&p.file_path), None)
            }
            (DataSetKind::BlobFolder, DataSet { blob_folder: Some(p), .. }) => {
                (&p.container_name, &p.storage, None, Some(&p.prefix))
            }
            (DataSetKind::Container, DataSet { container: Some(p), .. }) => {
                (&p.container_name, &p.storage, None, None)
            }
            (kind, _) => {
                return Err(ArmError::UnexpectedKind {
                    resource_type: TYPE_NAME.to_string(),
                    id: id.to_string(),
                    expected: "Blob, BlobFolder or Container".to_string(),
                    found: kind.to_string(),
                });
            }
        };

        data.set("name", &id.data_set_name)?;
        data.set(DATA_SHARE_ID, id.share_id().id())?;
        data.set("container_name", container_name)?;
        data.set("storage_account", [StorageAccountBlock::from(storage)])?;
        data.set("file_path", file_path)?;
        data.set("folder_path", folder_path)?;
        data.set("display_name", data_set.name.as_deref().unwrap_or(&id.data_set_name))?;
        Ok(())
    }

    async fn delete(&self, ctx: &OperationContext, data: &mut ResourceData) -> Result<()> {
        let id = DataSetId::parse_insensitively(data.require_id()?)?;

        let client = self.client.as_ref();
        let id_ref = &id;
        ctx.reconciler
            .delete(&id.id(), move || client.delete(id_ref))
            .await?;

        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datashare::fake::FakeDataSets;
    use serde_json::{Map, json};

    const SUB: &str = "00000000-0000-0000-0000-000000000000";
    const SHARE: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.DataShare/accounts/acc1/shares/share1";

    fn planned(extra: Value) -> ResourceData {
        let Value::Object(mut attributes) = json!({
            "name": "dataset1",
            "data_share_id": SHARE,
            "container_name": "container1",
            "storage_account": [{
                "name": "acct1",
                "resource_group_name": "rg1",
                "subscription_id": SUB,
            }],
        }) else {
            unreachable!()
        };
        if let Value::Object(extra) = extra {
            attributes.extend(extra);
        }
        ResourceData::new(attributes)
    }

    fn dataset_id() -> DataSetId {
        DataSetId::new(SUB, "rg1", "acc1", "share1", "dataset1")
    }

    #[tokio::test]
    async fn test_create_single_blob() {
        let fake = Arc::new(FakeDataSets::default());
        let resource = BlobStorageDataSet::new(fake.clone());
        let mut data = planned(json!({"file_path": "exports/day1.csv"}));

        resource.create(&OperationContext::default(), &mut data).await.unwrap();

        assert_eq!(data.id(), Some(format!("{SHARE}/dataSets/dataset1").as_str()));
        assert_eq!(data.get_str("file_path"), Some("exports/day1.csv"));
        assert_eq!(data.get_str("folder_path"), None);
        assert_eq!(data.get_str("display_name"), Some("dataset1"));

        let stored = fake.get(&dataset_id()).await.unwrap();
        assert_eq!(stored["kind"], "Blob");
    }

    #[tokio::test]
    async fn test_create_folder_and_container() {
        let fake = Arc::new(FakeDataSets::default());
        let resource = BlobStorageDataSet::new(fake.clone());

        let mut folder = planned(json!({"folder_path": "exports/"}));
        resource.create(&OperationContext::default(), &mut folder).await.unwrap();
        assert_eq!(fake.get(&dataset_id()).await.unwrap()["kind"], "BlobFolder");
        assert_eq!(folder.get_str("folder_path"), Some("exports/"));

        fake.data_sets.lock().unwrap().clear();

        let mut container = planned(json!({}));
        resource.create(&OperationContext::default(), &mut container).await.unwrap();
        assert_eq!(fake.get(&dataset_id()).await.unwrap()["kind"], "Container");
        let account: Vec<StorageAccountBlock> = container.get("storage_account").unwrap();
        assert_eq!(account[0].name, "acct1");
    }

    #[tokio::test]
    async fn test_create_over_existing_requires_import() {
        let fake = Arc::new(FakeDataSets::default());
        let resource = BlobStorageDataSet::new(fake.clone());
        let ctx = OperationContext::default();
        resource.create(&ctx, &mut planned(json!({}))).await.unwrap();

        let err = resource.create(&ctx, &mut planned(json!({}))).await.unwrap_err();
        assert!(matches!(err, ArmError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_read_wrong_kind_names_the_dataset() {
        let fake = Arc::new(FakeDataSets::default());
        fake.insert(
            &dataset_id(),
            json!({
                "kind": "KustoDatabase",
                "properties": {"kustoDatabaseResourceId": "/kusto/db1"}
            }),
        );

        let mut data = ResourceData::existing(dataset_id().id(), Map::new());
        let err = BlobStorageDataSet::new(fake)
            .read(&OperationContext::default(), &mut data)
            .await
            .unwrap_err();

        match err {
            ArmError::UnexpectedKind { id, found, .. } => {
                assert!(id.contains("dataset1"));
                assert_eq!(found, "KustoDatabase");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_malformed_body_names_the_dataset() {
        let fake = Arc::new(FakeDataSets::default());
        fake.insert(&dataset_id(), json!({"kind": "Blob", "properties": {"filePath": 42}}));

        let mut data = ResourceData::existing(dataset_id().id(), Map::new());
        let err = BlobStorageDataSet::new(fake)
            .read(&OperationContext::default(), &mut data)
            .await
            .unwrap_err();

        match &err {
            ArmError::Payload { operation, id, .. } => {
                assert_eq!(*operation, Operation::Read);
                assert_eq!(id, &dataset_id().id());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("dataset1"));
    }

    #[tokio::test]
    async fn test_read_gone_and_delete_idempotent() {
        let fake = Arc::new(FakeDataSets::default());
        let resource = BlobStorageDataSet::new(fake.clone());
        let ctx = OperationContext::default();
        let mut data = planned(json!({}));
        resource.create(&ctx, &mut data).await.unwrap();
        let id = data.id().unwrap().to_string();

        resource.delete(&ctx, &mut data).await.unwrap();
        assert!(data.id().is_none());

        let mut gone = ResourceData::existing(id.clone(), Map::new());
        resource.read(&ctx, &mut gone).await.unwrap();
        assert!(gone.id().is_none());

        let mut again = ResourceData::existing(id, Map::new());
        resource.delete(&ctx, &mut again).await.unwrap();
    }

    #[test]
    fn test_validate() {
        let resource = BlobStorageDataSet::new(Arc::new(FakeDataSets::default()));
        assert!(resource.validate(&planned(json!({}))).is_ok());

        let both = planned(json!({"file_path": "a", "folder_path": "b"}));
        assert!(matches!(resource.validate(&both), Err(ArmError::Validation(e)) if e.key == "file_path"));

        let bad_account = planned(json!({
            "storage_account": {"name": "Bad-Name", "resource_group_name": "rg1", "subscription_id": SUB}
        }));
        assert!(matches!(
            resource.validate(&bad_account),
            Err(ArmError::Validation(e)) if e.key == "storage_account.0.name"
        ));
    }

    #[tokio::test]
    async fn test_update_is_refused() {
        let resource = BlobStorageDataSet::new(Arc::new(FakeDataSets::default()));
        let err = resource
            .update(&OperationContext::default(), &mut planned(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ArmError::UpdateNotSupported(_)));
    }
}

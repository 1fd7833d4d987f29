//! Data Share datasets as a tagged variant
//!
//! The API returns one of several dataset shapes discriminated by `kind`.
//! [`DataSet`] carries the kind plus one optional payload per variant; only
//! the payload matching `kind` is populated.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSetKind {
    Blob,
    BlobFolder,
    Container,
    AdlsGen2File,
    AdlsGen2Folder,
    AdlsGen2FileSystem,
    KustoCluster,
    KustoDatabase,
    SqlDbTable,
    SqlDwTable,
}

impl DataSetKind {
    pub const ALL: [DataSetKind; 10] = [
        DataSetKind::Blob,
        DataSetKind::BlobFolder,
        DataSetKind::Container,
        DataSetKind::AdlsGen2File,
        DataSetKind::AdlsGen2Folder,
        DataSetKind::AdlsGen2FileSystem,
        DataSetKind::KustoCluster,
        DataSetKind::KustoDatabase,
        DataSetKind::SqlDbTable,
        DataSetKind::SqlDwTable,
    ];

    /// Discriminator as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSetKind::Blob => "Blob",
            DataSetKind::BlobFolder => "BlobFolder",
            DataSetKind::Container => "Container",
            DataSetKind::AdlsGen2File => "AdlsGen2File",
            DataSetKind::AdlsGen2Folder => "AdlsGen2Folder",
            DataSetKind::AdlsGen2FileSystem => "AdlsGen2FileSystem",
            DataSetKind::KustoCluster => "KustoCluster",
            DataSetKind::KustoDatabase => "KustoDatabase",
            DataSetKind::SqlDbTable => "SqlDBTable",
            DataSetKind::SqlDwTable => "SqlDWTable",
        }
    }

    pub fn is_blob_storage(&self) -> bool {
        matches!(
            self,
            DataSetKind::Blob | DataSetKind::BlobFolder | DataSetKind::Container
        )
    }
}

impl fmt::Display for DataSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown dataset kind {s:?}"))
    }
}

/// Where a storage-backed dataset lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    pub subscription_id: String,
    pub resource_group: String,
    pub storage_account_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobProperties {
    pub container_name: String,
    pub file_path: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobFolderProperties {
    pub container_name: String,
    pub prefix: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProperties {
    pub container_name: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdlsGen2FileProperties {
    pub file_system: String,
    pub file_path: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdlsGen2FolderProperties {
    pub file_system: String,
    pub folder_path: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdlsGen2FileSystemProperties {
    pub file_system: String,
    #[serde(flatten)]
    pub storage: StorageLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustoClusterProperties {
    pub kusto_cluster_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustoDatabaseProperties {
    pub kusto_database_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlDbTableProperties {
    pub database_name: String,
    pub schema_name: String,
    pub sql_server_resource_id: String,
    pub table_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlDwTableProperties {
    pub data_warehouse_name: String,
    pub schema_name: String,
    pub sql_server_resource_id: String,
    pub table_name: String,
}

/// A dataset of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSet {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: DataSetKind,
    /// Server-assigned identifier of the dataset contents
    pub data_set_id: Option<String>,

    pub blob: Option<BlobProperties>,
    pub blob_folder: Option<BlobFolderProperties>,
    pub container: Option<ContainerProperties>,
    pub adls_gen2_file: Option<AdlsGen2FileProperties>,
    pub adls_gen2_folder: Option<AdlsGen2FolderProperties>,
    pub adls_gen2_file_system: Option<AdlsGen2FileSystemProperties>,
    pub kusto_cluster: Option<KustoClusterProperties>,
    pub kusto_database: Option<KustoDatabaseProperties>,
    pub sql_db_table: Option<SqlDbTableProperties>,
    pub sql_dw_table: Option<SqlDwTableProperties>,
}

/// `{id, name, kind, properties}` as exchanged with the API
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    kind: String,
    #[serde(default)]
    properties: Value,
}

impl DataSet {
    /// An empty dataset of `kind`; set the matching payload before sending.
    pub fn new(kind: DataSetKind) -> Self {
        Self {
            id: None,
            name: None,
            kind,
            data_set_id: None,
            blob: None,
            blob_folder: None,
            container: None,
            adls_gen2_file: None,
            adls_gen2_folder: None,
            adls_gen2_file_system: None,
            kusto_cluster: None,
            kusto_database: None,
            sql_db_table: None,
            sql_dw_table: None,
        }
    }

    pub fn blob(properties: BlobProperties) -> Self {
        Self {
            blob: Some(properties),
            ..Self::new(DataSetKind::Blob)
        }
    }

    pub fn blob_folder(properties: BlobFolderProperties) -> Self {
        Self {
            blob_folder: Some(properties),
            ..Self::new(DataSetKind::BlobFolder)
        }
    }

    pub fn container(properties: ContainerProperties) -> Self {
        Self {
            container: Some(properties),
            ..Self::new(DataSetKind::Container)
        }
    }

    /// Decode the API representation, dispatching on `kind`.
    pub fn from_arm(value: Value) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_value(value)?;
        let kind: DataSetKind = envelope.kind.parse().map_err(serde_json::Error::custom)?;

        let data_set_id = envelope
            .properties
            .get("dataSetId")
            .and_then(Value::as_str)
            .map(str::to_string);
        let properties = envelope.properties;

        let mut data_set = Self {
            id: envelope.id,
            name: envelope.name,
            data_set_id,
            ..Self::new(kind)
        };

        match kind {
            DataSetKind::Blob => data_set.blob = Some(serde_json::from_value(properties)?),
            DataSetKind::BlobFolder => data_set.blob_folder = Some(serde_json::from_value(properties)?),
            DataSetKind::Container => data_set.container = Some(serde_json::from_value(properties)?),
            DataSetKind::AdlsGen2File => {
                data_set.adls_gen2_file = Some(serde_json::from_value(properties)?)
            }
            DataSetKind::AdlsGen2Folder => {
                data_set.adls_gen2_folder = Some(serde_json::from_value(properties)?)
            }
            DataSetKind::AdlsGen2FileSystem => {
                data_set.adls_gen2_file_system = Some(serde_json::from_value(properties)?)
            }
            DataSetKind::KustoCluster => {
                data_set.kusto_cluster = Some(serde_json::from_value(properties)?)
            }
            DataSetKind::KustoDatabase => {
                data_set.kusto_database = Some(serde_json::from_value(properties)?)
            }
            DataSetKind::SqlDbTable => data_set.sql_db_table = Some(serde_json::from_value(properties)?),
            DataSetKind::SqlDwTable => data_set.sql_dw_table = Some(serde_json::from_value(properties)?),
        }

        Ok(data_set)
    }

    /// Encode for the API. Fails when the payload for `kind` is missing.
    pub fn to_arm(&self) -> Result<Value, serde_json::Error> {
        let properties = match self.kind {
            DataSetKind::Blob => payload(&self.blob),
            DataSetKind::BlobFolder => payload(&self.blob_folder),
            DataSetKind::Container => payload(&self.container),
            DataSetKind::AdlsGen2File => payload(&self.adls_gen2_file),
            DataSetKind::AdlsGen2Folder => payload(&self.adls_gen2_folder),
            DataSetKind::AdlsGen2FileSystem => payload(&self.adls_gen2_file_system),
            DataSetKind::KustoCluster => payload(&self.kusto_cluster),
            DataSetKind::KustoDatabase => payload(&self.kusto_database),
            DataSetKind::SqlDbTable => payload(&self.sql_db_table),
            DataSetKind::SqlDwTable => payload(&self.sql_dw_table),
        }
        .ok_or_else(|| {
            serde_json::Error::custom(format!("{} dataset is missing its properties", self.kind))
        })??;

        Ok(json!({
            "kind": self.kind.as_str(),
            "properties": properties,
        }))
    }
}

fn payload<T: Serialize>(value: &Option<T>) -> Option<Result<Value, serde_json::Error>> {
    value.as_ref().map(serde_json::to_value)
}

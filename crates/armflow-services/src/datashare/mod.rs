//! Data Share datasets

mod blob_storage;
mod client;
mod model;

#[cfg(test)]
pub(crate) mod fake;

pub use blob_storage::{BlobStorageDataSet, StorageAccountBlock};
pub use client::{API_VERSION, ArmDataSets, DataSetsClient};
pub use model::{
    AdlsGen2FileProperties, AdlsGen2FileSystemProperties, AdlsGen2FolderProperties,
    BlobFolderProperties, BlobProperties, ContainerProperties, DataSet, DataSetKind,
    KustoClusterProperties, KustoDatabaseProperties, SqlDbTableProperties, SqlDwTableProperties,
    StorageLocation,
};

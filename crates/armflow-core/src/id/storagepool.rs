//! Storage pool identifiers

resource_group_scoped_id! {
    /// A disk pool
    DiskPoolId, "Disk Pool", "Microsoft.StoragePool",
    { disk_pool_name: "diskPools" => "Name" }
}

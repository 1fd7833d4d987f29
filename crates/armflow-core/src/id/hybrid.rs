//! Hybrid compute (Azure Arc) identifiers

resource_group_scoped_id! {
    /// An Azure Arc enabled machine
    ArcMachineId, "Arc Machine", "Microsoft.HybridCompute",
    { machine_name: "machines" => "Name" }
}

//! Compute identifiers

resource_group_scoped_id! {
    /// A virtual machine
    VirtualMachineId, "Virtual Machine", "Microsoft.Compute",
    { virtual_machine_name: "virtualMachines" => "Name" }
}

resource_group_scoped_id! {
    /// A virtual machine scale set
    VirtualMachineScaleSetId, "Virtual Machine Scale Set", "Microsoft.Compute",
    { virtual_machine_scale_set_name: "virtualMachineScaleSets" => "Name" }
}

resource_group_scoped_id! {
    /// A dedicated host group
    DedicatedHostGroupId, "Dedicated Host Group", "Microsoft.Compute",
    { host_group_name: "hostGroups" => "Name" }
}

resource_group_scoped_id! {
    /// A dedicated host inside a host group
    DedicatedHostId, "Dedicated Host", "Microsoft.Compute",
    {
        host_group_name: "hostGroups" => "Host Group",
        host_name: "hosts" => "Name",
    }
}

resource_group_scoped_id! {
    /// A managed disk
    ManagedDiskId, "Managed Disk", "Microsoft.Compute",
    { disk_name: "disks" => "Name" }
}

impl DedicatedHostId {
    /// The host group this host belongs to
    pub fn host_group_id(&self) -> DedicatedHostGroupId {
        DedicatedHostGroupId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.host_group_name,
        )
    }
}

//! Composite identifiers joining two ordinary ids with a reserved separator

use super::{DiskPoolId, ManagedDiskId, ObjectReplicationPolicyId, ResourceId};
use crate::error::{IdError, Result};
use std::fmt;

/// Split `input` on `separator`, requiring exactly two non-empty halves.
fn split_pair<'a>(
    description: &'static str,
    input: &'a str,
    separator: &'static str,
) -> Result<(&'a str, &'a str)> {
    let parts: Vec<&str> = input.split(separator).collect();
    match parts.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => Ok((*first, *second)),
        [_, _] => Err(IdError::Empty {
            description,
            input: input.to_string(),
        }),
        _ => Err(IdError::CompositeSeparator {
            description,
            input: input.to_string(),
            separator,
            found: parts.len() - 1,
        }),
    }
}

fn parse_component<T: ResourceId>(
    description: &'static str,
    input: &str,
    component: &str,
) -> Result<T> {
    T::parse(component).map_err(|source| IdError::Component {
        description,
        input: input.to_string(),
        source: Box::new(source),
    })
}

/// Both sides of an object replication: `{sourcePolicyId};{destinationPolicyId}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReplicationId {
    pub source: ObjectReplicationPolicyId,
    pub destination: ObjectReplicationPolicyId,
}

impl ObjectReplicationId {
    pub const DESCRIPTION: &'static str = "Object Replication";
    pub const SEPARATOR: &'static str = ";";

    pub fn new(source: ObjectReplicationPolicyId, destination: ObjectReplicationPolicyId) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let (source, destination) = split_pair(Self::DESCRIPTION, input, Self::SEPARATOR)?;
        Ok(Self {
            source: parse_component(Self::DESCRIPTION, input, source)?,
            destination: parse_component(Self::DESCRIPTION, input, destination)?,
        })
    }

    pub fn id(&self) -> String {
        format!("{}{}{}", self.source.id(), Self::SEPARATOR, self.destination.id())
    }
}

impl fmt::Display for ObjectReplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Source {} / Destination {})",
            Self::DESCRIPTION,
            self.source,
            self.destination
        )
    }
}

/// A managed disk attached to a disk pool: `{diskPoolId}/managedDisks|{managedDiskId}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiskPoolManagedDiskAttachmentId {
    pub disk_pool: DiskPoolId,
    pub managed_disk: ManagedDiskId,
}

impl DiskPoolManagedDiskAttachmentId {
    pub const DESCRIPTION: &'static str = "Disk Pool Managed Disk Attachment";
    pub const SEPARATOR: &'static str = "/managedDisks|";

    pub fn new(disk_pool: DiskPoolId, managed_disk: ManagedDiskId) -> Self {
        Self {
            disk_pool,
            managed_disk,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let (pool, disk) = split_pair(Self::DESCRIPTION, input, Self::SEPARATOR)?;
        Ok(Self {
            disk_pool: parse_component(Self::DESCRIPTION, input, pool)?,
            managed_disk: parse_component(Self::DESCRIPTION, input, disk)?,
        })
    }

    pub fn id(&self) -> String {
        format!(
            "{}{}{}",
            self.disk_pool.id(),
            Self::SEPARATOR,
            self.managed_disk.id()
        )
    }
}

impl fmt::Display for DiskPoolManagedDiskAttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} / {})",
            Self::DESCRIPTION,
            self.disk_pool,
            self.managed_disk
        )
    }
}

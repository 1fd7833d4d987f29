//! Storage identifiers (control plane)

use super::{ResourceId, Segment};

resource_group_scoped_id! {
    /// A storage account
    StorageAccountId, "Storage Account", "Microsoft.Storage",
    { storage_account_name: "storageAccounts" => "Name" }
}

resource_group_scoped_id! {
    /// One side of an object replication policy, held by a storage account
    ObjectReplicationPolicyId, "Object Replication Policy", "Microsoft.Storage",
    {
        storage_account_name: "storageAccounts" => "Storage Account",
        object_replication_policy_name: "objectReplicationPolicies" => "Name",
    }
}

/// A file share managed through the control plane:
/// `.../storageAccounts/{account}/fileServices/default/shares/{share}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageShareId {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub storage_account_name: String,
    pub share_name: String,
}

impl StorageShareId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        storage_account_name: impl Into<String>,
        share_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            storage_account_name: storage_account_name.into(),
            share_name: share_name.into(),
        }
    }

    pub fn storage_account_id(&self) -> StorageAccountId {
        StorageAccountId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.storage_account_name,
        )
    }
}

impl ResourceId for StorageShareId {
    const DESCRIPTION: &'static str = "Storage Share";
    const SEGMENTS: &'static [Segment] = &[
        Segment::fixed("subscriptions"),
        Segment::subscription_id(),
        Segment::fixed("resourceGroups"),
        Segment::resource_group(),
        Segment::fixed("providers"),
        Segment::provider("Microsoft.Storage"),
        Segment::fixed("storageAccounts"),
        Segment::user("storage_account_name", "Storage Account"),
        Segment::fixed("fileServices"),
        Segment::fixed("default"),
        Segment::fixed("shares"),
        Segment::user("share_name", "Name"),
    ];

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: values.next().unwrap_or_default(),
            resource_group_name: values.next().unwrap_or_default(),
            storage_account_name: values.next().unwrap_or_default(),
            share_name: values.next().unwrap_or_default(),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
            self.storage_account_name.as_str(),
            self.share_name.as_str(),
        ]
    }
}

impl_display_and_from_str!(StorageShareId);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdError;

    const SHARE: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct1/fileServices/default/shares/share1";

    #[test]
    fn test_share_parse() {
        let id = StorageShareId::parse(SHARE).unwrap();
        assert_eq!(id.storage_account_name, "acct1");
        assert_eq!(id.share_name, "share1");
        assert_eq!(id.id(), SHARE);
        assert_eq!(
            id.storage_account_id().id(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct1"
        );
    }

    #[test]
    fn test_share_requires_default_file_service() {
        let input = SHARE.replace("/default/", "/other/");
        let err = StorageShareId::parse(&input).unwrap_err();
        assert!(matches!(
            err,
            IdError::UnexpectedSegment {
                expected: "default",
                ..
            }
        ));
    }

    #[test]
    fn test_account_is_not_a_share() {
        let err = StorageShareId::parse(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct1",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IdError::MissingSegment {
                segment: "fileServices",
                ..
            }
        ));
    }
}

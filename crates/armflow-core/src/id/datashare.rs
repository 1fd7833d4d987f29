//! Data Share identifiers

resource_group_scoped_id! {
    /// A Data Share account
    DataShareAccountId, "Data Share Account", "Microsoft.DataShare",
    { account_name: "accounts" => "Name" }
}

resource_group_scoped_id! {
    /// A share inside a Data Share account
    DataShareId, "Data Share", "Microsoft.DataShare",
    {
        account_name: "accounts" => "Account",
        share_name: "shares" => "Name",
    }
}

resource_group_scoped_id! {
    /// A dataset inside a share
    DataSetId, "Data Share Data Set", "Microsoft.DataShare",
    {
        account_name: "accounts" => "Account",
        share_name: "shares" => "Share",
        data_set_name: "dataSets" => "Name",
    }
}

impl DataShareId {
    pub fn account_id(&self) -> DataShareAccountId {
        DataShareAccountId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.account_name,
        )
    }
}

impl DataSetId {
    pub fn share_id(&self) -> DataShareId {
        DataShareId::new(
            &self.subscription_id,
            &self.resource_group_name,
            &self.account_name,
            &self.share_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ResourceId;

    #[test]
    fn test_data_set_hierarchy() {
        let id = DataSetId::new("sub", "rg", "acc1", "share1", "ds1");
        assert_eq!(
            id.id(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.DataShare/accounts/acc1/shares/share1/dataSets/ds1"
        );
        assert_eq!(id.share_id().account_id().account_name, "acc1");
        assert_eq!(
            id.to_string(),
            r#"Data Share Data Set (Resource Group "rg" / Account "acc1" / Share "share1" / Name "ds1")"#
        );
    }
}

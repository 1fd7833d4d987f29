//! Subscription and resource group identifiers

use super::{ResourceId, Segment};

/// `/subscriptions/{subscriptionId}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId {
    pub subscription_id: String,
}

impl SubscriptionId {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
        }
    }
}

impl ResourceId for SubscriptionId {
    const DESCRIPTION: &'static str = "Subscription";
    const SEGMENTS: &'static [Segment] = &[
        Segment::fixed("subscriptions"),
        Segment::user("subscription_id", "Subscription"),
    ];

    fn from_values(values: Vec<String>) -> Self {
        Self {
            subscription_id: values.into_iter().next().unwrap_or_default(),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str()]
    }
}

impl_display_and_from_str!(SubscriptionId);

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceGroupId {
    pub subscription_id: String,
    pub resource_group_name: String,
}

impl ResourceGroupId {
    pub fn new(subscription_id: impl Into<String>, resource_group_name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
        }
    }
}

impl ResourceId for ResourceGroupId {
    const DESCRIPTION: &'static str = "Resource Group";
    const SEGMENTS: &'static [Segment] = &[
        Segment::fixed("subscriptions"),
        Segment::subscription_id(),
        Segment::fixed("resourceGroups"),
        Segment::user("resource_group_name", "Name"),
    ];

    fn from_values(values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        Self {
            subscription_id: values.next().unwrap_or_default(),
            resource_group_name: values.next().unwrap_or_default(),
        }
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group_name.as_str(),
        ]
    }
}

impl_display_and_from_str!(ResourceGroupId);

//! Path segment definitions for ARM resource identifiers

/// Kind of a single path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed literal such as `resourceGroups`
    Static(&'static str),
    /// Resource provider namespace such as `Microsoft.Compute`
    ResourceProvider(&'static str),
    /// Subscription UUID
    SubscriptionId,
    /// Resource group name
    ResourceGroup,
    /// Name chosen by the user
    UserSpecified,
    /// A nested ARM identifier; only valid as the first segment
    Scope,
}

/// One segment of an identifier grammar.
///
/// `name` is what a missing-segment error reports, `label` is what the
/// human-readable description prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: SegmentKind,
}

impl Segment {
    pub const fn fixed(value: &'static str) -> Self {
        Self {
            name: value,
            label: "",
            kind: SegmentKind::Static(value),
        }
    }

    pub const fn provider(namespace: &'static str) -> Self {
        Self {
            name: namespace,
            label: "",
            kind: SegmentKind::ResourceProvider(namespace),
        }
    }

    pub const fn subscription_id() -> Self {
        Self {
            name: "subscription_id",
            label: "Subscription",
            kind: SegmentKind::SubscriptionId,
        }
    }

    pub const fn resource_group() -> Self {
        Self {
            name: "resource_group_name",
            label: "Resource Group",
            kind: SegmentKind::ResourceGroup,
        }
    }

    pub const fn user(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: SegmentKind::UserSpecified,
        }
    }

    pub const fn scope(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: SegmentKind::Scope,
        }
    }

    /// Literal text for fixed segments
    pub fn literal(&self) -> Option<&'static str> {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the segment carries a value extracted at parse time
    pub fn is_variable(&self) -> bool {
        self.literal().is_none()
    }
}

//! Azure cloud environments
//!
//! Endpoints and domain suffixes differ per sovereign cloud. Data-plane ids
//! are validated against the active environment's storage suffix instead of a
//! hardcoded `core.windows.net`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Short name used in configuration (`public`, `china`, `usgovernment`)
    pub name: &'static str,
    pub resource_manager_endpoint: &'static str,
    pub storage_suffix: &'static str,
}

impl Environment {
    pub const fn public() -> Self {
        Self {
            name: "public",
            resource_manager_endpoint: "https://management.azure.com",
            storage_suffix: "core.windows.net",
        }
    }

    pub const fn china() -> Self {
        Self {
            name: "china",
            resource_manager_endpoint: "https://management.chinacloudapi.cn",
            storage_suffix: "core.chinacloudapi.cn",
        }
    }

    pub const fn us_government() -> Self {
        Self {
            name: "usgovernment",
            resource_manager_endpoint: "https://management.usgovcloudapi.net",
            storage_suffix: "core.usgovcloudapi.net",
        }
    }

    /// Look up an environment by its configuration name, ignoring case.
    ///
    /// The long SDK names (`AzurePublicCloud`, ...) are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "public" | "azurepubliccloud" => Some(Self::public()),
            "china" | "azurechinacloud" => Some(Self::china()),
            "usgovernment" | "azureusgovernmentcloud" => Some(Self::us_government()),
            _ => None,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::public(), Self::china(), Self::us_government()]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::public()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

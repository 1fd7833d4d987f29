pub mod error;
pub mod features;
pub mod provider;

pub use error::*;
pub use features::{UserFeatures, expand_features, features_block_required};
pub use provider::{ProviderConfig, ResolvedConfig, RetryOverrides, TimeoutOverrides};

use std::path::PathBuf;

const CANDIDATES: [&str; 4] = [
    "armflow.local.yaml",
    ".armflow.local.yaml",
    "armflow.yaml",
    ".armflow.yaml",
];

/// Directory holding the global configuration (`~/.config/armflow`)
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("armflow"))
}

/// Find the provider configuration file.
///
/// Lookup order:
/// 1. `ARMFLOW_CONFIG_PATH` (a direct path)
/// 2. the current directory: armflow.local.yaml, .armflow.local.yaml, armflow.yaml, .armflow.yaml
/// 3. the same names inside `./.armflow/`
/// 4. `~/.config/armflow/armflow.yaml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("ARMFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let project_dir = current_dir.join(".armflow");
    if project_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = project_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(dir) = global_config_dir() {
        let global_config = dir.join("armflow.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Locate and load the provider configuration.
pub fn load_config() -> Result<ProviderConfig> {
    let path = find_config_file()?;
    tracing::debug!(path = %path.display(), "loading provider configuration");
    ProviderConfig::load(&path)
}

use crate::context::load_provider_config;
use armflow_config::{ConfigError, expand_features, features_block_required};
use std::path::Path;

/// Print the features block expanded over the defaults.
pub fn handle(config_path: Option<&Path>, legacy: bool) -> anyhow::Result<()> {
    let config = load_provider_config(config_path)?.unwrap_or_default();
    let legacy = legacy || config.legacy_test_suite;

    if config.features.is_none() && features_block_required(legacy) {
        return Err(ConfigError::MissingFeaturesBlock.into());
    }

    let features = expand_features(&config.feature_blocks());
    print!("{}", serde_yaml::to_string(&features)?);
    Ok(())
}

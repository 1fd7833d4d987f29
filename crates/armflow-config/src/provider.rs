//! Provider configuration file

use crate::error::{ConfigError, Result};
use crate::features::{UserFeatures, expand_features, features_block_required};
use armflow_core::Environment;
use armflow_core::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Raw provider settings as written in `armflow.yaml`.
///
/// ```yaml
/// subscription_id: 00000000-0000-0000-0000-000000000000
/// environment: public
/// features:
///   virtual_machine:
///     skip_shutdown_and_force_delete: true
/// timeouts:
///   create: 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub subscription_id: Option<String>,

    #[serde(default)]
    pub environment: Option<String>,

    /// The raw `features` block, either a mapping or a single-element list
    #[serde(default)]
    pub features: Option<Value>,

    /// Lets the legacy acceptance-test harness omit `features`
    #[serde(default)]
    pub legacy_test_suite: bool,

    #[serde(default)]
    pub timeouts: TimeoutOverrides,

    #[serde(default)]
    pub retry: RetryOverrides,
}

/// Per-operation timeout overrides, in minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutOverrides {
    pub create: Option<u64>,
    pub read: Option<u64>,
    pub update: Option<u64>,
    pub delete: Option<u64>,
}

/// Backoff overrides for transient-failure retries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetryOverrides {
    pub initial_delay_secs: Option<u64>,
    pub max_delay_secs: Option<u64>,
    pub backoff_multiplier: Option<f64>,
}

/// Validated settings used to build the application context
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub subscription_id: String,
    pub environment: Environment,
    pub features: UserFeatures,
    pub timeouts: TimeoutOverrides,
    pub retry: RetryOverrides,
}

impl ProviderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// The `features` block as the list form taken by [`expand_features`].
    pub fn feature_blocks(&self) -> Vec<Value> {
        match &self.features {
            None => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        }
    }

    /// Apply environment overrides and validate.
    ///
    /// `ARM_SUBSCRIPTION_ID` and `ARM_ENVIRONMENT` take precedence over the
    /// file.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        if self.features.is_none() && features_block_required(self.legacy_test_suite) {
            return Err(ConfigError::MissingFeaturesBlock);
        }

        let subscription_id = std::env::var("ARM_SUBSCRIPTION_ID")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.subscription_id.clone())
            .ok_or(ConfigError::MissingSubscriptionId)?;
        validate::is_uuid(&subscription_id, "subscription_id")?;

        let environment_name = std::env::var("ARM_ENVIRONMENT")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.environment.clone())
            .unwrap_or_else(|| "public".to_string());
        let environment = Environment::from_name(&environment_name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment_name.clone()))?;

        let features = expand_features(&self.feature_blocks());
        debug!(environment = %environment, "resolved provider configuration");

        Ok(ResolvedConfig {
            subscription_id,
            environment,
            features,
            timeouts: self.timeouts,
            retry: self.retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SUB: &str = "00000000-0000-0000-0000-000000000000";

    fn without_arm_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset(["ARM_SUBSCRIPTION_ID", "ARM_ENVIRONMENT"], f)
    }

    #[test]
    #[serial]
    fn test_resolve_with_mapping_features() {
        let config = ProviderConfig::from_yaml(&format!(
            "subscription_id: {SUB}\nfeatures:\n  virtual_machine:\n    graceful_shutdown: true\n"
        ))
        .unwrap();

        let resolved = without_arm_env(|| config.resolve()).unwrap();
        assert_eq!(resolved.subscription_id, SUB);
        assert_eq!(resolved.environment, Environment::public());
        assert!(resolved.features.virtual_machine.graceful_shutdown);
        assert!(resolved.features.virtual_machine.delete_os_disk_on_deletion);
    }

    #[test]
    #[serial]
    fn test_resolve_list_features_and_timeouts() {
        let config = ProviderConfig::from_yaml(&format!(
            "subscription_id: {SUB}\nenvironment: china\nfeatures:\n  - netapp:\n      - prevent_volume_destruction: false\ntimeouts:\n  create: 90\n"
        ))
        .unwrap();

        let resolved = without_arm_env(|| config.resolve()).unwrap();
        assert_eq!(resolved.environment, Environment::china());
        assert!(!resolved.features.netapp.prevent_volume_destruction);
        assert_eq!(resolved.timeouts.create, Some(90));
        assert_eq!(resolved.timeouts.read, None);
    }

    #[test]
    #[serial]
    fn test_missing_features_block() {
        let config = ProviderConfig::from_yaml(&format!("subscription_id: {SUB}\n")).unwrap();
        let err = without_arm_env(|| config.resolve()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFeaturesBlock));

        let legacy = ProviderConfig {
            legacy_test_suite: true,
            ..config
        };
        let resolved = without_arm_env(|| legacy.resolve()).unwrap();
        assert_eq!(resolved.features, UserFeatures::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let config = ProviderConfig::from_yaml(
            "subscription_id: not-used\nenvironment: public\nfeatures: {}\n",
        )
        .unwrap();

        let resolved = temp_env::with_vars(
            [
                ("ARM_SUBSCRIPTION_ID", Some("11111111-1111-1111-1111-111111111111")),
                ("ARM_ENVIRONMENT", Some("usgovernment")),
            ],
            || config.resolve(),
        )
        .unwrap();

        assert_eq!(resolved.subscription_id, "11111111-1111-1111-1111-111111111111");
        assert_eq!(resolved.environment, Environment::us_government());
    }

    #[test]
    #[serial]
    fn test_invalid_values() {
        let bad_sub = ProviderConfig::from_yaml("subscription_id: nope\nfeatures: {}\n").unwrap();
        assert!(matches!(
            without_arm_env(|| bad_sub.resolve()),
            Err(ConfigError::Invalid(_))
        ));

        let bad_env =
            ProviderConfig::from_yaml(&format!("subscription_id: {SUB}\nenvironment: mars\nfeatures: {{}}\n"))
                .unwrap();
        assert!(matches!(
            without_arm_env(|| bad_env.resolve()),
            Err(ConfigError::UnknownEnvironment(name)) if name == "mars"
        ));

        let no_sub = ProviderConfig::from_yaml("features: {}\n").unwrap();
        assert!(matches!(
            without_arm_env(|| no_sub.resolve()),
            Err(ConfigError::MissingSubscriptionId)
        ));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("armflow.yaml");
        std::fs::write(&path, "subscription_id: [unclosed").unwrap();

        match ProviderConfig::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }
}

//! Application context, built once per invocation

use anyhow::Context as _;
use armflow_cloud::{ArmClient, OperationContext, Reconciler, RetryConfig, StateManager, Timeouts};
use armflow_config::{ConfigError, ProviderConfig};
use std::path::Path;
use tracing::debug;

pub struct AppContext {
    pub operation: OperationContext,
    pub client: ArmClient,
    pub state: StateManager,
}

impl AppContext {
    /// Resolve configuration, credentials and the state location.
    pub fn build(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = load_provider_config(config_path)?.unwrap_or_default();
        let resolved = config.resolve()?;

        let token = std::env::var("ARM_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .context("ARM_ACCESS_TOKEN is not set")?;

        let reconciler = Reconciler::new(
            RetryConfig::default().with_overrides(&resolved.retry),
            Timeouts::default().with_overrides(&resolved.timeouts),
        );
        debug!(environment = %resolved.environment, "built application context");

        Ok(Self {
            client: ArmClient::new(&resolved.environment, token),
            operation: OperationContext {
                subscription_id: resolved.subscription_id,
                reconciler,
                features: resolved.features,
                environment: resolved.environment,
            },
            state: StateManager::new(std::env::current_dir()?),
        })
    }
}

/// Load the explicit file, or discover one. `None` when discovery finds nothing.
pub fn load_provider_config(explicit: Option<&Path>) -> anyhow::Result<Option<ProviderConfig>> {
    if let Some(path) = explicit {
        return Ok(Some(ProviderConfig::load(path)?));
    }
    match armflow_config::load_config() {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::ConfigFileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

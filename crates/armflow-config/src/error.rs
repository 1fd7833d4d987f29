use armflow_core::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked in:\n\
        - the current directory: armflow.local.yaml, .armflow.local.yaml, armflow.yaml, .armflow.yaml\n\
        - the ./.armflow/ directory\n\
        - ~/.config/armflow/armflow.yaml\n\
        The ARMFLOW_CONFIG_PATH environment variable can point at a file directly"
    )]
    ConfigFileNotFound,

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("the `features` block is required; add `features: {{}}` to use the defaults")]
    MissingFeaturesBlock,

    #[error("`subscription_id` was not set in the configuration or via ARM_SUBSCRIPTION_ID")]
    MissingSubscriptionId,

    #[error("unknown environment {0:?}; expected one of public, china, usgovernment")]
    UnknownEnvironment(String),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! Resource lifecycle error types

use crate::remote::RemoteError;
use crate::retry::Operation;
use armflow_core::{IdError, ValidationError};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by resource operations.
///
/// Every variant that concerns a remote object names the operation and the
/// canonical id.
#[derive(Error, Debug)]
pub enum ArmError {
    #[error("A resource with the ID {id:?} already exists - to be managed it needs to be imported into the state. See the {resource_type:?} documentation for more information")]
    AlreadyExists { id: String, resource_type: String },

    #[error("{operation} {id}: {source}")]
    Remote {
        operation: Operation,
        id: String,
        #[source]
        source: RemoteError,
    },

    #[error("{operation} {id}: still failing after {attempts} attempts: {message}")]
    RetryExhausted {
        operation: Operation,
        id: String,
        attempts: u32,
        message: String,
    },

    #[error("{operation} {id}: timed out after {timeout:?}")]
    Timeout {
        operation: Operation,
        id: String,
        timeout: Duration,
    },

    #[error("{operation} {id}: malformed payload: {source}")]
    Payload {
        operation: Operation,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource_type} {id} has unexpected kind {found:?}, expected {expected:?}")]
    UnexpectedKind {
        resource_type: String,
        id: String,
        expected: String,
        found: String,
    },

    #[error("{0} cannot be updated in place")]
    UpdateNotSupported(String),

    #[error("missing required attribute `{0}`")]
    MissingAttribute(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error("State file error: {0}")]
    State(String),

    #[error("Lock acquisition failed: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArmError {
    pub fn remote(operation: Operation, id: impl Into<String>, source: RemoteError) -> Self {
        Self::Remote {
            operation,
            id: id.into(),
            source,
        }
    }

    pub fn payload(operation: Operation, id: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Payload {
            operation,
            id: id.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArmError>;

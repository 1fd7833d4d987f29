//! armflow cloud
//!
//! Everything between a resource definition and the Azure Resource Manager
//! API: the remote error model, retry classification, the reconciler that
//! every resource goes through, the persisted state store and a thin REST
//! client.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 armflow CLI                   │
//! └──────────────────────┬────────────────────────┘
//!                        │ OperationContext
//! ┌──────────────────────▼────────────────────────┐
//! │  armflow-services: trait Resource impls       │
//! └──────────────────────┬────────────────────────┘
//!                        │
//! ┌──────────────────────▼────────────────────────┐
//! │                armflow-cloud                  │
//! │  ┌────────────┐ ┌──────────┐ ┌─────────────┐  │
//! │  │ Reconciler │ │ ArmClient│ │ StateManager│  │
//! │  └────────────┘ └──────────┘ └─────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod reconciler;
pub mod remote;
pub mod resource;
pub mod retry;
pub mod state;

pub use client::ArmClient;
pub use error::{ArmError, Result};
pub use reconciler::{Created, DeleteOutcome, Phase, Reconciler};
pub use remote::RemoteError;
pub use resource::{OperationContext, Resource, ResourceData};
pub use retry::{ErrorClassifier, Operation, RetryConfig, RetryDecision, Timeouts, TransientConditions};
pub use state::{GlobalState, ResourceState, ResourceStatus, StateLock, StateManager};

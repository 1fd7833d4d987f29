//! armflow core
//!
//! Resource identity for Azure Resource Manager: typed identifiers for each
//! resource kind, the cloud environments they live in, and the pure field
//! validators used before any request reaches the API.
//!
//! # Example
//!
//! ```
//! use armflow_core::id::{ResourceId, VirtualMachineId};
//!
//! let id = VirtualMachineId::new("00000000-0000-0000-0000-000000000000", "rg", "vm1");
//! let parsed = VirtualMachineId::parse(&id.id()).unwrap();
//! assert_eq!(parsed, id);
//! ```

pub mod environment;
pub mod error;
pub mod id;
pub mod validate;

pub use environment::Environment;
pub use error::{IdError, Result, ValidationError};
pub use id::ResourceId;

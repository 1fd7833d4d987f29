//! armflow codegen
//!
//! Offline generator turning an explicit resource schema (YAML) into Rust
//! model structs with serde derives. It never needs a live provider.

pub mod error;
pub mod generator;
pub mod schema;

pub use error::{CodegenError, Result};
pub use generator::{generate_file, generate_models};
pub use schema::{FieldSchema, FieldType, ResourceSchema};

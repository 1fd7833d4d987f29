//! armflow services
//!
//! Concrete resources built on the lifecycle engine in `armflow-cloud`:
//!
//! - [`maintenance`]: maintenance configuration assignments to fixed targets
//!   and to dynamic scopes
//! - [`datashare`]: Data Share datasets backed by blob storage
//!
//! Each resource talks to the API through a small client trait, so tests
//! swap in an in-memory fake.

pub mod datashare;
pub mod maintenance;

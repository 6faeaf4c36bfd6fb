//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (indiepilot-infra) implements. The core crate never depends on any
//! specific storage technology, and apart from [`snapshot`] every port is
//! read-only.

pub mod activity;
pub mod settings;
pub mod snapshot;

//! Shared domain types for IndiePilot.
//!
//! Skill definitions, activity records, autonomy scores, per-user settings,
//! scoring configuration, and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod activity;
pub mod autonomy;
pub mod config;
pub mod error;
pub mod settings;
pub mod skill;

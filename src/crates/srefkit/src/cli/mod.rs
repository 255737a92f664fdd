//! CLI command implementations
//!
//! Provides command handlers for the srefkit CLI binary.

pub mod analyze;
pub mod context;
pub mod model;
pub mod settings;
pub mod validate;

pub use context::{build_orchestrator, build_provisioner, open_settings};

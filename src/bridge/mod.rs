//! Host-facing bridge facade.
//!
//! A [`Bridge`] owns one rendering surface and exposes:
//!
//! | Area | Methods |
//! |------|---------|
//! | Lifecycle | `initialize`, `deinitialize`, `get_current_url` |
//! | Loading | `load`, `wait_till_loaded`, `wait_ready` |
//! | Evaluation | `run`, `run_with_callback`, `run_with_return` |
//! | Pre-document scripts | `add_script_on_load`, `remove_script_on_load`, `clear_scripts_on_load` |
//!
//! Host calls may come from any thread. Surface work is marshalled onto the
//! UI context; callbacks run on the callback runtime.

// ============================================================================
// Submodules
// ============================================================================

/// Bridge builder.
pub mod builder;

/// Configuration.
pub mod options;

mod core;
mod executor;
mod hooks;
mod navigation;
mod script;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BridgeBuilder;
pub use core::Bridge;
pub use options::{BridgeOptions, EvalPolicy};

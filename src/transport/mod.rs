//! Page ↔ host transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Host (Rust)    │   evaluate(js)  (UI post)    │  Page           │
//! │                 │─────────────────────────────►│                 │
//! │  MessageBridge  │                              │  window.__GJ    │
//! │  (callbacks)    │◄─────────────────────────────│  console.info   │
//! │                 │   "__GJ__:{...}" lines       │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! Evaluation is fire-and-forget; results come back as console lines
//! correlated by a host-chosen id. [`ReadinessGate`] holds evaluation back
//! until the page has committed its first visible paint.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `console` | Console demultiplexing and pending-callback registry |
//! | `readiness` | Page-load readiness gate |

// ============================================================================
// Submodules
// ============================================================================

/// Console demultiplexing and pending callbacks.
pub mod console;

/// Page-load readiness gate.
pub mod readiness;

// ============================================================================
// Re-exports
// ============================================================================

pub use console::{CallbackHandler, DiagnosticSink, MessageBridge};
pub use readiness::{ReadinessGate, ReadinessState};

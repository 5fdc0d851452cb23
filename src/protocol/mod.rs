//! Console bridge protocol.
//!
//! The page has no channel back to the host except its console. Bridge
//! traffic is smuggled through `console.info` as prefixed JSON lines.
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `{"t":"cb","id":..,"result":..}` | Page → Host | Completes a pending callback |
//! | `{"t":"log","msg":..}` | Page → Host | Forwards a page log line |
//!
//! Every line starts with [`BRIDGE_PREFIX`]. Lines without it are ordinary
//! console output.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `bootstrap` | Page-side bridge object installed before page scripts |
//! | `message` | Wire message types and decoding helpers |

// ============================================================================
// Submodules
// ============================================================================

/// Page-side bootstrap script.
pub mod bootstrap;

/// Wire message types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use bootstrap::{BRIDGE_GLOBAL, bootstrap_script, json_string};
pub use message::{
    BRIDGE_PREFIX, BridgeMessage, bridge_payload, decode_js_string, normalize_console_text,
};

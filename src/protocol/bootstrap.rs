//! Page-side bridge bootstrap.
//!
//! Defines a non-enumerable, non-writable `window.__GJ` object exposing
//! `callback(id, result)` and `log(msg)`. Both emit through
//! `console.info` under [`BRIDGE_PREFIX`]. Installation is guarded so the
//! object is defined once per page even if the script runs twice.

use super::message::BRIDGE_PREFIX;

// ============================================================================
// Constants
// ============================================================================

/// Name of the page global holding the bridge object.
pub const BRIDGE_GLOBAL: &str = "__GJ";

// ============================================================================
// Bootstrap
// ============================================================================

/// Builds the bootstrap script.
#[must_use]
pub fn bootstrap_script() -> String {
    let prefix = json_string(BRIDGE_PREFIX);
    let global = json_string(BRIDGE_GLOBAL);

    format!(
        r#"(() => {{
  try {{
    if (Object.prototype.hasOwnProperty.call(window, {global})) return;

    const PREFIX = {prefix};
    const emit = (obj) => {{
      try {{
        console.info(PREFIX + JSON.stringify(obj));
      }} catch (_) {{}}
    }};

    Object.defineProperty(window, {global}, {{
      value: {{
        callback: (id, result) => {{
          try {{
            const r = (typeof result === "string")
              ? result
              : (() => {{ try {{ return JSON.stringify(result); }} catch (_) {{ return String(result); }} }})();
            emit({{ t: "cb", id: String(id), result: r }});
          }} catch (_) {{}}
        }},
        log: (msg) => {{
          try {{ emit({{ t: "log", msg: String(msg) }}); }} catch (_) {{}}
        }}
      }},
      enumerable: false,
      configurable: false,
      writable: false
    }});
  }} catch (_) {{}}
}})();"#
    )
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escapes a string for safe use as a JavaScript string literal.
pub fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

// ============================================================================
// Tests
// ============================================================================

//! Console demultiplexing and pending-callback registry.
//!
//! Every console line from the page passes through
//! [`MessageBridge::on_console_message`]:
//!
//! - bridge `cb` lines complete the matching pending callback
//! - bridge `log` lines are forwarded to diagnostics
//! - anything else is ordinary page output, logged and left unhandled
//!
//! Callbacks are invoked on the blocking pool of the bridge's tokio
//! runtime, never on the UI context that delivered the console line.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::identifiers::CallbackId;
use crate::protocol::{BridgeMessage, bridge_payload, decode_js_string};
use crate::surface::{ConsoleLevel, ConsoleMessage};

// ============================================================================
// Types
// ============================================================================

/// Handler receiving the decoded result of a callback or evaluation.
pub type CallbackHandler = Box<dyn FnOnce(Option<String>) + Send + 'static>;

/// Map of correlation ids to waiting handlers.
type CallbackMap = FxHashMap<CallbackId, CallbackHandler>;

// ============================================================================
// DiagnosticSink
// ============================================================================

/// Secondary destination for page output, e.g. a developer console.
pub trait DiagnosticSink: Send + Sync {
    /// Receives informational page output.
    fn info(&self, text: &str);

    /// Receives page errors.
    fn error(&self, text: &str);
}

// ============================================================================
// MessageBridge
// ============================================================================

/// Demultiplexes console traffic and owns the pending-callback registry.
///
/// # Thread Safety
///
/// Registration happens on host worker threads and completion on the UI
/// context; both go through the same lock.
pub struct MessageBridge {
    /// Pending callbacks by correlation id.
    callbacks: Mutex<CallbackMap>,
    /// Runtime used to run handlers off the UI context.
    executor: Handle,
    /// Optional mirror for page output.
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBridge")
            .field("pending", &self.pending_count())
            .field("diagnostics", &self.diagnostics.is_some())
            .finish_non_exhaustive()
    }
}

impl MessageBridge {
    /// Creates a bridge delivering callbacks on `executor`.
    #[must_use]
    pub fn new(executor: Handle) -> Self {
        Self {
            callbacks: Mutex::new(CallbackMap::default()),
            executor,
            diagnostics: None,
        }
    }

    /// Mirrors page output to `sink`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Option<Arc<dyn DiagnosticSink>>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Registers a handler for the callback `id`.
    ///
    /// A handler already waiting under the same id is replaced and never
    /// invoked.
    pub fn register_pending(&self, id: CallbackId, handler: CallbackHandler) {
        let replaced = self.callbacks.lock().insert(id.clone(), handler);
        if replaced.is_some() {
            warn!(id = %id, "Replaced pending callback with the same id");
        }
        debug!(id = %id, "Callback registered");
    }

    /// Removes a pending handler without invoking it.
    pub fn remove_pending(&self, id: &CallbackId) -> bool {
        self.callbacks.lock().remove(id).is_some()
    }

    /// Returns the number of pending callbacks.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// Drops every pending handler. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let pending: Vec<_> = self.callbacks.lock().drain().collect();
        let count = pending.len();
        if count > 0 {
            debug!(count, "Dropped pending callbacks");
        }
        count
    }

    /// Handles one console line. Returns `true` if it was bridge traffic.
    pub fn on_console_message(&self, message: &ConsoleMessage) -> bool {
        if let Some(payload) = bridge_payload(&message.text)
            && self.handle_payload(payload)
        {
            return true;
        }

        if message.level == ConsoleLevel::Error {
            error!(line = message.line, text = %message.text, "Browser error");
            if let Some(sink) = &self.diagnostics {
                sink.error(&format!("Browser Error:{} [{}]", message.text, message.line));
            }
        } else {
            info!(level = %message.level, text = %message.text, "Browser log");
            if let Some(sink) = &self.diagnostics {
                sink.info(&format!("Browser Log:{}", message.text));
            }
        }

        false
    }

    /// Handles the JSON payload of a bridge line.
    ///
    /// Returns `false` only when the payload is not a bridge envelope.
    pub fn handle_payload(&self, payload: &str) -> bool {
        debug!(payload = %payload, "Bridge message");

        let message = match BridgeMessage::decode(payload) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, "Undecodable bridge payload");
                return false;
            }
        };

        match message {
            BridgeMessage::Callback { id, result } => self.complete(&id, result),
            BridgeMessage::Log { msg } => {
                info!(msg = %msg, "Browser log");
                if let Some(sink) = &self.diagnostics {
                    sink.info(&msg);
                }
            }
            BridgeMessage::Ignored { tag } => {
                debug!(tag = %tag, "Ignored bridge message");
            }
        }

        true
    }

    /// Removes and invokes the handler for `id`.
    fn complete(&self, id: &CallbackId, result: Option<String>) {
        let handler = self.callbacks.lock().remove(id);

        let Some(handler) = handler else {
            debug!(id = %id, "Callback for unknown id dropped");
            return;
        };

        debug!(id = %id, "Completing callback");
        self.executor.spawn_blocking(move || {
            handler(result.and_then(|raw| decode_or_raw(&raw)));
        });
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decodes a JS-serialized string, falling back to the raw text.
pub(crate) fn decode_or_raw(raw: &str) -> Option<String> {
    match decode_js_string(raw) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Result is not a JSON string; delivering raw text");
            Some(raw.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Script evaluation and pre-document script registration.
//!
//! | Method | Result delivery |
//! |--------|-----------------|
//! | [`Bridge::run`] | none |
//! | [`Bridge::run_with_callback`] | page calls `__GJ.callback(id, value)` |
//! | [`Bridge::run_with_return`] | completion value of the script |

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::identifiers::{CallbackId, ScriptId};
use crate::transport::CallbackHandler;
use crate::transport::console::decode_or_raw;

use super::Bridge;
use super::executor::Completion;
use super::options::EvalPolicy;

// ============================================================================
// Bridge - Evaluation
// ============================================================================

impl Bridge {
    /// Evaluates `script` in the page, ignoring its result.
    ///
    /// Waits for readiness first, bounded by the configured timeout.
    pub fn run(&self, script: &str) {
        self.dispatch(script, None);
    }

    /// Evaluates `script` and routes the page's `__GJ.callback(id, value)`
    /// call to `callback`.
    ///
    /// `callback` runs off the UI context, at most once. It never runs if
    /// the page does not call back or the bridge is deinitialized first.
    pub fn run_with_callback<F>(&self, script: &str, callback_id: impl Into<CallbackId>, callback: F)
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let handler: CallbackHandler = Box::new(callback);
        self.dispatch(script, Some((callback_id.into(), handler)));
    }

    /// Evaluates `script` and delivers its completion value to `callback`.
    ///
    /// JSON string values are decoded; anything else is delivered as raw
    /// text. `callback` receives `None` when the evaluation fails or is
    /// skipped.
    pub fn run_with_return<F>(&self, script: &str, callback: F)
    where
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let completion = Completion::new(Box::new(callback), self.inner.executor.handle().clone());

        if !self.ensure_ready() {
            completion.deliver(None);
            return;
        }

        let surface = match self.surface() {
            Ok(surface) => surface,
            Err(e) => {
                error!(error = %e, "Browser running failed");
                completion.deliver(None);
                return;
            }
        };

        info!(script = %self.preview(script), "Browser running JS with return");

        let source = script.to_string();
        let on_result = completion.clone();
        let on_error = completion.clone();
        let posted = self.inner.ui.post(Box::new(move || {
            let result = surface.lock().evaluate(
                &source,
                Box::new(move |raw| {
                    debug!("Browser run returned");
                    on_result.deliver(raw.and_then(|raw| decode_or_raw(&raw)));
                }),
            );
            if let Err(e) = result {
                error!(error = %e, "Browser running failed");
                on_error.deliver(None);
            }
        }));

        if let Err(e) = posted {
            error!(error = %e, "Browser running failed");
            completion.deliver(None);
        }
    }

    fn dispatch(&self, script: &str, callback: Option<(CallbackId, CallbackHandler)>) {
        if !self.ensure_ready() {
            return;
        }

        let surface = match self.surface() {
            Ok(surface) => surface,
            Err(e) => {
                error!(error = %e, "Browser running failed");
                return;
            }
        };

        let callback_id = match callback {
            Some((id, handler)) => {
                self.inner.messages.register_pending(id.clone(), handler);
                Some(id)
            }
            None => None,
        };

        info!(
            callback_id = callback_id.as_ref().map(CallbackId::as_str),
            script = %self.preview(script),
            "Browser running JS"
        );

        let source = script.to_string();
        let posted = self.inner.ui.post(Box::new(move || {
            let result = surface
                .lock()
                .evaluate(&source, Box::new(|_| debug!("Browser run finished")));
            if let Err(e) = result {
                error!(error = %e, "Browser running failed");
            }
        }));

        if let Err(e) = posted {
            error!(error = %e, "Browser running failed");
            if let Some(id) = callback_id {
                self.inner.messages.remove_pending(&id);
            }
        }
    }

    /// Readiness wait plus policy. Returns `false` if evaluation must be
    /// skipped.
    fn ensure_ready(&self) -> bool {
        if self.wait_ready() {
            return true;
        }

        match self.inner.options.eval_policy {
            EvalPolicy::FireRegardless => true,
            EvalPolicy::RequireReady => {
                warn!("Skipping evaluation, page not ready");
                false
            }
        }
    }

    /// First characters of `script` for logging.
    fn preview<'a>(&self, script: &'a str) -> Cow<'a, str> {
        let limit = self.inner.options.script_preview_len;
        match script.char_indices().nth(limit) {
            Some((at, _)) => Cow::Owned(format!("{}...", &script[..at])),
            None => Cow::Borrowed(script),
        }
    }
}

// ============================================================================
// Bridge - Pre-document Scripts
// ============================================================================

impl Bridge {
    /// Registers `script` to run before page scripts on every later
    /// navigation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `script` is blank
    /// - [`Error::NotInitialized`] if the surface does not exist
    /// - any error from native installation
    pub fn add_script_on_load(&self, script: &str) -> Result<ScriptId> {
        if script.trim().is_empty() {
            return Err(Error::invalid_argument("Script must be non-empty."));
        }
        self.surface()?;
        self.inner.scripts.add(script)
    }

    /// Removes a registration by its id string.
    ///
    /// Returns `true` iff a registration existed. Blank or malformed ids
    /// return `false`.
    pub fn remove_script_on_load(&self, id: &str) -> bool {
        ScriptId::parse(id).is_some_and(|id| self.inner.scripts.remove(&id))
    }

    /// Removes every registration, bootstrap included.
    pub fn clear_scripts_on_load(&self) {
        self.inner.scripts.clear_all();
    }
}

// ============================================================================
// Tests
// ============================================================================

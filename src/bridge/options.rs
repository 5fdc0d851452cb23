//! Bridge configuration options.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use webview_bridge::{BridgeOptions, EvalPolicy};
//!
//! let options = BridgeOptions::new()
//!     .with_wait_timeout(Duration::from_secs(2))
//!     .with_eval_policy(EvalPolicy::RequireReady)
//!     .with_fallback_injection();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::surface::SurfaceSettings;

// ============================================================================
// Constants
// ============================================================================

/// Default readiness wait before evaluating.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default timeout of the fallback document fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of script characters included in logs.
pub const DEFAULT_SCRIPT_PREVIEW_LEN: usize = 200;

/// Default worker count of the owned callback runtime.
pub const DEFAULT_CALLBACK_THREADS: usize = 2;

// ============================================================================
// EvalPolicy
// ============================================================================

/// What to do when the readiness wait before an evaluation times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalPolicy {
    /// Evaluate anyway.
    #[default]
    FireRegardless,
    /// Skip the evaluation; value-returning calls receive `None`.
    RequireReady,
}

// ============================================================================
// BridgeOptions
// ============================================================================

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Readiness wait used by `run`, `run_with_return` and `wait_ready`.
    pub wait_timeout: Duration,

    /// Timeout of the fallback document fetch.
    pub fetch_timeout: Duration,

    /// Use native pre-document injection when the surface supports it.
    pub prefer_native_injection: bool,

    /// Behavior when the readiness wait times out.
    pub eval_policy: EvalPolicy,

    /// Script characters included in log lines.
    pub script_preview_len: usize,

    /// Worker threads of the owned callback runtime.
    pub callback_threads: usize,

    /// Origin patterns for native pre-document scripts.
    pub origin_patterns: Vec<String>,

    /// Settings applied to the surface at creation.
    pub surface: SurfaceSettings,
}

// ============================================================================
// Constructors
// ============================================================================

impl BridgeOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            prefer_native_injection: true,
            eval_policy: EvalPolicy::FireRegardless,
            script_preview_len: DEFAULT_SCRIPT_PREVIEW_LEN,
            callback_threads: DEFAULT_CALLBACK_THREADS,
            origin_patterns: vec!["*".to_string()],
            surface: SurfaceSettings::new(),
        }
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BridgeOptions {
    /// Sets the readiness wait.
    #[inline]
    #[must_use]
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Sets the fallback fetch timeout.
    #[inline]
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Forces the fallback mechanism even on surfaces with native support.
    #[inline]
    #[must_use]
    pub fn with_fallback_injection(mut self) -> Self {
        self.prefer_native_injection = false;
        self
    }

    /// Sets the evaluation policy.
    #[inline]
    #[must_use]
    pub fn with_eval_policy(mut self, policy: EvalPolicy) -> Self {
        self.eval_policy = policy;
        self
    }

    /// Sets the script preview length used in logs.
    #[inline]
    #[must_use]
    pub fn with_script_preview_len(mut self, len: usize) -> Self {
        self.script_preview_len = len;
        self
    }

    /// Sets the callback runtime worker count.
    #[inline]
    #[must_use]
    pub fn with_callback_threads(mut self, threads: usize) -> Self {
        self.callback_threads = threads;
        self
    }

    /// Sets the origin patterns for native pre-document scripts.
    #[inline]
    #[must_use]
    pub fn with_origin_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.origin_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the surface settings.
    #[inline]
    #[must_use]
    pub fn with_surface_settings(mut self, settings: SurfaceSettings) -> Self {
        self.surface = settings;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

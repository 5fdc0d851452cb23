//! Builder pattern for bridge configuration.
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::{Bridge, BridgeOptions};
//!
//! let bridge = Bridge::builder()
//!     .surface_factory(MyEngine::factory())
//!     .options(BridgeOptions::new().with_fallback_injection())
//!     .build()?;
//! bridge.initialize()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Error, Result};
use crate::injection::Fetcher;
use crate::surface::{SurfaceFactory, UiContext, UiThread};
use crate::transport::{DiagnosticSink, MessageBridge};

use super::core::Bridge;
use super::executor::Executor;
use super::options::BridgeOptions;

// ============================================================================
// Constants
// ============================================================================

/// Name of the UI thread spawned when no context is supplied.
const DEFAULT_UI_THREAD_NAME: &str = "bridge-ui";

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`].
///
/// Use [`Bridge::builder()`] to create one.
#[derive(Default)]
pub struct BridgeBuilder {
    /// Creates the surface on initialize. Required.
    factory: Option<Arc<dyn SurfaceFactory>>,
    /// UI context; a dedicated thread is spawned when unset.
    ui: Option<Arc<dyn UiContext>>,
    /// Runtime for callbacks; an owned runtime is built when unset.
    runtime: Option<Handle>,
    /// Fetcher used by fallback interception.
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Mirror for page output.
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    /// Configuration.
    options: BridgeOptions,
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("factory", &self.factory.is_some())
            .field("ui", &self.ui.is_some())
            .field("runtime", &self.runtime.is_some())
            .field("fetcher", &self.fetcher.is_some())
            .field("diagnostics", &self.diagnostics.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// BridgeBuilder Implementation
// ============================================================================

impl BridgeBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the surface factory.
    #[inline]
    #[must_use]
    pub fn surface_factory(mut self, factory: impl SurfaceFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Sets the UI context that owns the surface.
    #[inline]
    #[must_use]
    pub fn ui_context(mut self, ui: Arc<dyn UiContext>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Runs callbacks on an existing tokio runtime.
    #[inline]
    #[must_use]
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Overrides the fetcher used by fallback interception.
    #[inline]
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Mirrors page logs and errors to `sink`.
    #[inline]
    #[must_use]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Replaces the whole configuration.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the default readiness wait.
    #[inline]
    #[must_use]
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.options.wait_timeout = timeout;
        self
    }

    /// Builds the bridge. The surface is created by
    /// [`Bridge::initialize`].
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no surface factory is set
    /// - [`Error::Config`] if the wait timeout is zero
    /// - [`Error::Io`] if the UI thread or runtime cannot be started
    pub fn build(self) -> Result<Bridge> {
        let factory = self.factory.ok_or_else(|| {
            Error::config(
                "Surface factory is required. Use .surface_factory() to set it.\n\
                 Example: Bridge::builder().surface_factory(|settings| MySurface::create(settings))",
            )
        })?;

        if self.options.wait_timeout.is_zero() {
            return Err(Error::config("wait_timeout must be greater than zero"));
        }

        let ui: Arc<dyn UiContext> = match self.ui {
            Some(ui) => ui,
            None => Arc::new(UiThread::spawn(DEFAULT_UI_THREAD_NAME)?),
        };

        let executor = match self.runtime {
            Some(handle) => Executor::from_handle(handle),
            None => Executor::owned(self.options.callback_threads)?,
        };

        let messages =
            MessageBridge::new(executor.handle().clone()).with_diagnostics(self.diagnostics);

        Ok(Bridge::from_parts(
            self.options,
            factory,
            ui,
            executor,
            self.fetcher,
            messages,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

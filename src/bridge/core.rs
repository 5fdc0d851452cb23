//! Bridge state and lifecycle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::injection::{Fetcher, HttpFetcher, Mechanism, NetworkInterceptor, ScriptRegistry};
use crate::protocol::bootstrap_script;
use crate::surface::{ConsoleMessage, SurfaceFactory, UiContext, run_blocking};
use crate::transport::{MessageBridge, ReadinessGate, ReadinessState};

use super::builder::BridgeBuilder;
use super::executor::Executor;
use super::hooks::{NavigationHooks, SurfaceCell, SurfaceInjector};
use super::options::BridgeOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a bridge.
pub(crate) struct BridgeInner {
    /// Configuration.
    pub options: BridgeOptions,
    /// Creates the surface on initialize.
    factory: Arc<dyn SurfaceFactory>,
    /// Context that owns the surface.
    pub ui: Arc<dyn UiContext>,
    /// Runs host callbacks.
    pub executor: Executor,
    /// Fetcher override for fallback interception.
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Live surface, `None` while uninitialized.
    surface: Mutex<Option<SurfaceCell>>,
    /// Page readiness.
    pub gate: Arc<ReadinessGate>,
    /// Console message routing.
    pub messages: Arc<MessageBridge>,
    /// Pre-document scripts.
    pub scripts: Arc<ScriptRegistry>,
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.get_mut().take()
            && let Err(e) = self.ui.post(Box::new(move || {
                surface.lock().destroy();
            }))
        {
            debug!(error = %e, "Failed to destroy surface in Drop");
        }
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Host-facing handle to one rendering surface.
///
/// Cheap to clone; clones share the surface and all registries.
#[derive(Clone)]
pub struct Bridge {
    pub(crate) inner: Arc<BridgeInner>,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("initialized", &self.is_initialized())
            .field("readiness", &self.readiness())
            .field("pending_callbacks", &self.pending_callbacks())
            .field("scripts", &self.inner.scripts.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bridge - Construction
// ============================================================================

impl Bridge {
    /// Creates a bridge builder.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    pub(crate) fn from_parts(
        options: BridgeOptions,
        factory: Arc<dyn SurfaceFactory>,
        ui: Arc<dyn UiContext>,
        executor: Executor,
        fetcher: Option<Arc<dyn Fetcher>>,
        messages: MessageBridge,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                options,
                factory,
                ui,
                executor,
                fetcher,
                surface: Mutex::new(None),
                gate: Arc::new(ReadinessGate::new()),
                messages: Arc::new(messages),
                scripts: Arc::new(ScriptRegistry::new()),
            }),
        }
    }
}

// ============================================================================
// Bridge - Lifecycle
// ============================================================================

impl Bridge {
    /// Creates the surface, wires its listeners and installs the bootstrap
    /// script. Calling it again while initialized does nothing.
    ///
    /// Blocks until the UI context has created the surface; must not be
    /// called from inside an async task.
    ///
    /// # Errors
    ///
    /// - [`Error::UiUnavailable`] if the UI context has shut down
    /// - any error from the surface factory or the bootstrap installation
    pub fn initialize(&self) -> Result<()> {
        let mut slot = self.inner.surface.lock();
        if slot.is_some() {
            debug!("Browser already initialized");
            return Ok(());
        }

        let factory = Arc::clone(&self.inner.factory);
        let settings = self.inner.options.surface;
        let prefer_native = self.inner.options.prefer_native_injection;
        let fetch_timeout = self.inner.options.fetch_timeout;
        let fetcher = self.inner.fetcher.clone();
        let gate = Arc::clone(&self.inner.gate);
        let messages = Arc::clone(&self.inner.messages);
        let scripts = Arc::clone(&self.inner.scripts);

        let (surface, native) = run_blocking(self.inner.ui.as_ref(), move || -> Result<_> {
            let mut surface = factory.create(&settings)?;
            let native = prefer_native && surface.supports_pre_document_scripts();

            let interceptor = if native {
                None
            } else {
                let fetcher: Arc<dyn Fetcher> = match fetcher {
                    Some(fetcher) => fetcher,
                    None => Arc::new(HttpFetcher::new(fetch_timeout)?),
                };
                Some(NetworkInterceptor::new(
                    scripts,
                    fetcher,
                    surface.cookie_store(),
                    surface.user_agent(),
                ))
            };

            surface.set_navigation_listener(Arc::new(NavigationHooks::new(gate, interceptor)));
            surface.set_console_listener(Arc::new(move |message: &ConsoleMessage| {
                messages.on_console_message(message)
            }));

            Ok((surface, native))
        })??;

        let surface: SurfaceCell = Arc::new(Mutex::new(surface));

        if native {
            self.inner.scripts.set_injector(Some(Arc::new(SurfaceInjector::new(
                Arc::clone(&self.inner.ui),
                Arc::clone(&surface),
                self.inner.options.origin_patterns.clone(),
            ))));
        } else {
            self.inner.scripts.set_injector(None);
        }

        *slot = Some(surface);
        drop(slot);

        let mechanism = self.injection_mechanism();
        info!(?mechanism, "Browser initialized");

        if let Err(e) = self.inner.scripts.add(&bootstrap_script()) {
            warn!(error = %e, "Failed to install bridge bootstrap");
            self.deinitialize();
            return Err(e);
        }

        Ok(())
    }

    /// Destroys the surface and clears every registry.
    ///
    /// Pending callbacks are dropped without being invoked. Calling it
    /// while uninitialized does nothing.
    pub fn deinitialize(&self) {
        let Some(surface) = self.inner.surface.lock().take() else {
            return;
        };

        self.inner.scripts.clear_all();
        self.inner.scripts.set_injector(None);
        let dropped = self.inner.messages.clear();
        self.inner.gate.reset();

        let posted = self.inner.ui.post(Box::new(move || {
            surface.lock().destroy();
            debug!("Surface destroyed");
        }));
        if let Err(e) = posted {
            warn!(error = %e, "Failed to post surface destruction");
        }

        info!(dropped_callbacks = dropped, "Browser deinitialized");
    }

    /// Returns the URL the surface currently shows.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] if the surface does not exist
    /// - [`Error::UiUnavailable`] if the UI context has shut down
    pub fn get_current_url(&self) -> Result<Option<String>> {
        let surface = self.surface()?;
        run_blocking(self.inner.ui.as_ref(), move || surface.lock().current_url())
    }
}

// ============================================================================
// Bridge - Accessors
// ============================================================================

impl Bridge {
    /// Returns `true` between `initialize` and `deinitialize`.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.surface.lock().is_some()
    }

    /// Returns the page readiness state.
    #[inline]
    #[must_use]
    pub fn readiness(&self) -> ReadinessState {
        self.inner.gate.state()
    }

    /// Returns the number of callbacks awaiting a page message.
    #[inline]
    #[must_use]
    pub fn pending_callbacks(&self) -> usize {
        self.inner.messages.pending_count()
    }

    /// Returns the number of registered pre-document scripts, bootstrap
    /// included.
    #[inline]
    #[must_use]
    pub fn registered_scripts(&self) -> usize {
        self.inner.scripts.len()
    }

    /// Returns the mechanism new registrations use.
    #[inline]
    #[must_use]
    pub fn injection_mechanism(&self) -> Mechanism {
        self.inner.scripts.mechanism()
    }

    /// Returns the bridge configuration.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.inner.options
    }

    /// Returns the live surface.
    pub(crate) fn surface(&self) -> Result<SurfaceCell> {
        self.inner
            .surface
            .lock()
            .as_ref()
            .map(Arc::clone)
            .ok_or(Error::NotInitialized)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Surface-facing adapters installed at initialization.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::injection::{NativeInjector, NetworkInterceptor};
use crate::surface::{
    NavigationListener, RenderSurface, ScriptHandle, SyntheticResponse, UiContext, WebRequest,
    run_blocking,
};
use crate::transport::ReadinessGate;

// ============================================================================
// Types
// ============================================================================

/// Shared, UI-affine surface.
pub(crate) type SurfaceCell = Arc<Mutex<Box<dyn RenderSurface>>>;

// ============================================================================
// NavigationHooks
// ============================================================================

/// Opens the readiness gate on commit and routes fallback interception.
pub(crate) struct NavigationHooks {
    gate: Arc<ReadinessGate>,
    interceptor: Option<NetworkInterceptor>,
}

impl NavigationHooks {
    pub(crate) fn new(gate: Arc<ReadinessGate>, interceptor: Option<NetworkInterceptor>) -> Self {
        Self { gate, interceptor }
    }
}

impl NavigationListener for NavigationHooks {
    fn on_commit_visible(&self, url: &str) {
        self.gate.release();
        info!(url, "Browser loaded");
    }

    fn intercept_request(&self, request: &WebRequest) -> Option<SyntheticResponse> {
        self.interceptor.as_ref()?.intercept(request)
    }
}

// ============================================================================
// SurfaceInjector
// ============================================================================

/// Native injection through the surface, marshalled onto the UI context.
pub(crate) struct SurfaceInjector {
    ui: Arc<dyn UiContext>,
    surface: SurfaceCell,
    origins: Vec<String>,
}

impl SurfaceInjector {
    pub(crate) fn new(ui: Arc<dyn UiContext>, surface: SurfaceCell, origins: Vec<String>) -> Self {
        Self {
            ui,
            surface,
            origins,
        }
    }
}

impl NativeInjector for SurfaceInjector {
    fn install(&self, script: &str) -> Result<Box<dyn ScriptHandle>> {
        let surface = Arc::clone(&self.surface);
        let script = script.to_string();
        let origins = self.origins.clone();

        let handle = run_blocking(self.ui.as_ref(), move || {
            surface.lock().add_pre_document_script(&script, &origins)
        })??;

        debug!(origins = ?self.origins, "Pre-document script installed");
        Ok(handle)
    }

    fn uninstall(&self, handle: Box<dyn ScriptHandle>) -> Result<()> {
        run_blocking(self.ui.as_ref(), move || handle.remove())?
    }
}

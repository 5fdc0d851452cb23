//! Traits a rendering surface implementation must provide.
//!
//! Any engine can back the bridge: an embedded native web control, an
//! out-of-process browser, or a headless engine.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use crate::error::Result;

use super::cookies::CookieStore;
use super::types::{ConsoleMessage, SurfaceSettings, SyntheticResponse, WebRequest};

// ============================================================================
// Types
// ============================================================================

/// Console listener callback.
///
/// Returns `true` when the message was consumed and the surface should
/// skip its default console handling.
pub type ConsoleListener = Arc<dyn Fn(&ConsoleMessage) -> bool + Send + Sync>;

/// Completion callback for [`RenderSurface::evaluate`].
///
/// Receives the JS-serialized result, or `None` when the engine produced
/// no value.
pub type EvalCallback = Box<dyn FnOnce(Option<String>) + Send>;

// ============================================================================
// NavigationListener
// ============================================================================

/// Navigation hooks installed on the surface.
///
/// `intercept_request` is called from whatever context the engine resolves
/// network requests on, and may block.
pub trait NavigationListener: Send + Sync {
    /// The page reached its first visible paint.
    fn on_commit_visible(&self, url: &str);

    /// Offers a synthetic response for a request.
    ///
    /// `None` lets the surface load the request itself.
    fn intercept_request(&self, request: &WebRequest) -> Option<SyntheticResponse>;

    /// Returns `true` to cancel the surface's own handling of a navigation.
    fn should_override(&self, _request: &WebRequest) -> bool {
        false
    }
}

// ============================================================================
// ScriptHandle
// ============================================================================

/// Removable reference to a natively installed pre-document script.
pub trait ScriptHandle: Send {
    /// Uninstalls the script. Must run on the UI context.
    fn remove(self: Box<Self>) -> Result<()>;
}

// ============================================================================
// RenderSurface
// ============================================================================

/// A single script-capable rendering surface.
///
/// Every method is called on the UI context the surface was created on.
pub trait RenderSurface: Send {
    /// Starts loading `url`.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Evaluates `script` in the page and reports the serialized result.
    fn evaluate(&mut self, script: &str, on_result: EvalCallback) -> Result<()>;

    /// URL of the current document, if any.
    fn current_url(&self) -> Option<String>;

    /// Default user agent of the surface.
    fn user_agent(&self) -> String;

    /// Installs the console listener, replacing any previous one.
    fn set_console_listener(&mut self, listener: ConsoleListener);

    /// Installs the navigation listener, replacing any previous one.
    fn set_navigation_listener(&mut self, listener: Arc<dyn NavigationListener>);

    /// Whether scripts can be installed to run before any page script.
    fn supports_pre_document_scripts(&self) -> bool;

    /// Installs a script that runs before any page script on matching origins.
    fn add_pre_document_script(
        &mut self,
        script: &str,
        origin_patterns: &[String],
    ) -> Result<Box<dyn ScriptHandle>>;

    /// Cookie store shared with the surface's network stack.
    fn cookie_store(&self) -> Arc<dyn CookieStore>;

    /// Releases the surface. No other method is called afterwards.
    fn destroy(&mut self);
}

// ============================================================================
// SurfaceFactory
// ============================================================================

/// Creates rendering surfaces. Called on the UI context.
pub trait SurfaceFactory: Send + Sync {
    /// Creates a surface configured with `settings`.
    fn create(&self, settings: &SurfaceSettings) -> Result<Box<dyn RenderSurface>>;
}

impl<F> SurfaceFactory for F
where
    F: Fn(&SurfaceSettings) -> Result<Box<dyn RenderSurface>> + Send + Sync,
{
    fn create(&self, settings: &SurfaceSettings) -> Result<Box<dyn RenderSurface>> {
        self(settings)
    }
}

//! WebView Bridge - host-to-page JavaScript bridge for embedded web surfaces.
//!
//! This library drives an embedded rendering surface from host code:
//! loading pages, evaluating JavaScript, receiving results back from the
//! page and injecting scripts before any page script runs.
//!
//! # Architecture
//!
//! - **Host side (Rust)**: [`Bridge`] calls are accepted from any thread
//! - **UI context**: one thread owns the surface; all surface work runs there
//! - **Page side (JS)**: a bootstrap defines `window.__GJ`, which reports
//!   back through tagged `console.info` lines
//!
//! Key design principles:
//!
//! - The engine is abstracted behind [`RenderSurface`]; no engine is bundled
//! - Console lines prefixed with `__GJ__:` are bridge traffic, never logs
//! - Pre-document scripts use the engine's native hook when available and
//!   fall back to rewriting fetched HTML otherwise
//! - Host callbacks never run on the UI context
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use webview_bridge::{Bridge, Result};
//!
//! fn main() -> Result<()> {
//!     let bridge = Bridge::builder()
//!         .surface_factory(my_engine::create_surface)
//!         .build()?;
//!     bridge.initialize()?;
//!
//!     bridge.load("https://example.com");
//!     if bridge.wait_till_loaded(Duration::from_secs(5)) {
//!         bridge.run_with_callback("__GJ.callback('title', document.title)", "title", |title| {
//!             println!("Page title: {title:?}");
//!         });
//!     }
//!
//!     bridge.deinitialize();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Host-facing facade: [`Bridge`], [`BridgeBuilder`], [`BridgeOptions`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`injection`] | Pre-document script registry and HTML fallback |
//! | [`protocol`] | Page-side bootstrap and bridge message format |
//! | [`surface`] | Rendering surface capability and UI context |
//! | [`transport`] | Console message routing and page readiness |

// ============================================================================
// Modules
// ============================================================================

/// Host-facing bridge facade.
///
/// Use [`Bridge::builder()`] to create a configured bridge.
pub mod bridge;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for scripts and callbacks.
pub mod identifiers;

/// Pre-document script registration and the HTML-rewriting fallback.
pub mod injection;

/// Bridge wire format and page bootstrap.
pub mod protocol;

/// Rendering surface abstraction.
///
/// Embedders implement [`RenderSurface`] for their engine.
pub mod surface;

/// Console routing and readiness signalling.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{Bridge, BridgeBuilder, BridgeOptions, EvalPolicy};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{CallbackId, ScriptId};

// Injection types
pub use injection::{Fetcher, HttpFetcher, Mechanism, NetworkInterceptor, ScriptRegistry};

// Surface types
pub use surface::{
    ConsoleLevel, ConsoleMessage, CookieStore, MemoryCookieStore, NavigationListener,
    RenderSurface, ScriptHandle, SurfaceFactory, SurfaceSettings, SyntheticResponse, UiContext,
    UiThread, WebRequest,
};

// Transport types
pub use transport::{DiagnosticSink, ReadinessState};

//! Rendering surface capability.
//!
//! The bridge never talks to a concrete browser engine. It consumes the
//! [`RenderSurface`] trait, created through a [`SurfaceFactory`], and
//! marshals every call onto the surface's UI-affine context.
//!
//! # Threading
//!
//! ```text
//! ┌──────────────────┐   post / run_blocking   ┌──────────────────┐
//! │  Host workers    │────────────────────────►│  UI context      │
//! │  (Bridge calls)  │                         │  RenderSurface   │
//! └──────────────────┘                         └────────┬─────────┘
//!          ▲                                            │ listeners
//!          │ spawn_blocking                             ▼
//! ┌──────────────────┐                         ┌──────────────────┐
//! │  Callback pool   │◄────────────────────────│  MessageBridge   │
//! └──────────────────┘                         │  ReadinessGate   │
//!                                              │  Interceptor     │
//!                                              └──────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `capability` | Surface, factory, listener and script handle traits |
//! | `cookies` | Cookie store trait and in-memory store |
//! | `types` | Console messages, requests, synthetic responses, settings |
//! | `ui` | UI-affine execution context |

// ============================================================================
// Submodules
// ============================================================================

/// Surface, factory and listener traits.
pub mod capability;

/// Cookie store abstraction.
pub mod cookies;

/// Value types exchanged with the surface.
pub mod types;

/// UI-affine execution context.
pub mod ui;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use capability::{
    ConsoleListener, EvalCallback, NavigationListener, RenderSurface, ScriptHandle,
    SurfaceFactory,
};
pub use cookies::{CookieStore, MemoryCookieStore};
pub use types::{ConsoleLevel, ConsoleMessage, SurfaceSettings, SyntheticResponse, WebRequest};
pub use ui::{UiContext, UiJob, UiThread, run_blocking};

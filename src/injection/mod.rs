//! Pre-document script injection.
//!
//! Scripts registered with the bridge must run before any page script.
//! Two mechanisms exist, chosen once per registration:
//!
//! | Mechanism | When | How |
//! |-----------|------|-----|
//! | Native | surface supports pre-document scripts | installed on the surface, removable handle kept |
//! | Fallback | otherwise | main-frame HTML is fetched by the bridge and rewritten in flight |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `html` | Charset detection and `<head>` injection |
//! | `interceptor` | Main-frame request interception and fetch |
//! | `registry` | Script registrations keyed by [`ScriptId`](crate::ScriptId) |

// ============================================================================
// Submodules
// ============================================================================

/// HTML rewriting helpers.
pub mod html;

/// Network interception for fallback injection.
pub mod interceptor;

/// Script registrations.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use html::{charset_from_content_type, inject_into_head, is_html_content_type, script_block};
pub use interceptor::{
    FetchRequest, FetchedResponse, Fetcher, HttpFetcher, NetworkInterceptor, rewrite_response,
};
pub use registry::{Mechanism, NativeInjector, ScriptRegistry};

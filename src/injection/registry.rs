//! Script registrations.
//!
//! An id lives in exactly one table: the native table when an injector is
//! installed at registration time, the fallback table otherwise.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identifiers::ScriptId;
use crate::surface::ScriptHandle;

// ============================================================================
// Mechanism
// ============================================================================

/// How a registered script reaches the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    /// Installed on the surface as a pre-document script.
    Native,
    /// Injected into fetched HTML by the network interceptor.
    Fallback,
}

// ============================================================================
// NativeInjector
// ============================================================================

/// Installs and removes pre-document scripts on the surface.
pub trait NativeInjector: Send + Sync {
    /// Installs `script` and returns its removable handle.
    fn install(&self, script: &str) -> Result<Box<dyn ScriptHandle>>;

    /// Removes a previously installed script.
    fn uninstall(&self, handle: Box<dyn ScriptHandle>) -> Result<()>;
}

// ============================================================================
// ScriptRegistry
// ============================================================================

/// Fallback script with its registration order.
struct FallbackScript {
    seq: u64,
    source: String,
}

/// Tracks scripts that must run before page scripts.
#[derive(Default)]
pub struct ScriptRegistry {
    /// Present when the surface supports native injection.
    injector: RwLock<Option<Arc<dyn NativeInjector>>>,
    /// Natively installed scripts.
    native: Mutex<FxHashMap<ScriptId, Box<dyn ScriptHandle>>>,
    /// Scripts awaiting HTML injection.
    fallback: Mutex<FxHashMap<ScriptId, FallbackScript>>,
    /// Registration counter for fallback ordering.
    next_seq: AtomicU64,
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("mechanism", &self.mechanism())
            .field("native", &self.native.lock().len())
            .field("fallback", &self.fallback.lock().len())
            .finish()
    }
}

impl ScriptRegistry {
    /// Creates an empty registry using the fallback mechanism.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or clears the native injector.
    ///
    /// Existing registrations keep the mechanism they were created with.
    pub fn set_injector(&self, injector: Option<Arc<dyn NativeInjector>>) {
        *self.injector.write() = injector;
    }

    /// Mechanism new registrations will use.
    #[must_use]
    pub fn mechanism(&self) -> Mechanism {
        if self.injector.read().is_some() {
            Mechanism::Native
        } else {
            Mechanism::Fallback
        }
    }

    /// Registers a script.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `script` is blank
    /// - any error from the native injector
    pub fn add(&self, script: &str) -> Result<ScriptId> {
        if script.trim().is_empty() {
            return Err(Error::invalid_argument("Script must be non-empty."));
        }

        let id = ScriptId::generate();
        let injector = self.injector.read().clone();

        match injector {
            Some(injector) => {
                let handle = injector.install(script)?;
                self.native.lock().insert(id, handle);
            }
            None => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                self.fallback.lock().insert(
                    id,
                    FallbackScript {
                        seq,
                        source: script.to_string(),
                    },
                );
            }
        }

        info!(id = %id, "addScriptOnLoad() registered");
        Ok(id)
    }

    /// Removes a registration. Returns `true` iff one existed.
    pub fn remove(&self, id: &ScriptId) -> bool {
        let handle = self.native.lock().remove(id);
        if let Some(handle) = handle {
            self.uninstall(handle);
            info!(id = %id, "removeScriptOnLoad() removed");
            return true;
        }

        if self.fallback.lock().remove(id).is_some() {
            info!(id = %id, "removeScriptOnLoad() removed fallback");
            return true;
        }

        false
    }

    /// Removes every registration.
    pub fn clear_all(&self) {
        let handles: Vec<_> = self.native.lock().drain().map(|(_, h)| h).collect();
        self.fallback.lock().clear();

        for handle in handles {
            self.uninstall(handle);
        }

        info!("clearScriptsOnLoad() cleared");
    }

    /// Returns the mechanism of a registration.
    #[must_use]
    pub fn mechanism_of(&self, id: &ScriptId) -> Option<Mechanism> {
        if self.native.lock().contains_key(id) {
            Some(Mechanism::Native)
        } else if self.fallback.lock().contains_key(id) {
            Some(Mechanism::Fallback)
        } else {
            None
        }
    }

    /// Fallback scripts in registration order.
    #[must_use]
    pub fn fallback_scripts(&self) -> Vec<String> {
        let fallback = self.fallback.lock();
        let mut scripts: Vec<_> = fallback.values().map(|s| (s.seq, s.source.clone())).collect();
        scripts.sort_unstable_by_key(|(seq, _)| *seq);
        scripts.into_iter().map(|(_, source)| source).collect()
    }

    /// Returns `true` if any fallback script is registered.
    #[must_use]
    pub fn has_fallback_scripts(&self) -> bool {
        !self.fallback.lock().is_empty()
    }

    /// Number of registrations across both tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.native.lock().len() + self.fallback.lock().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Best-effort native removal.
    fn uninstall(&self, handle: Box<dyn ScriptHandle>) {
        let injector = self.injector.read().clone();
        let result = match injector {
            Some(injector) => injector.uninstall(handle),
            None => handle.remove(),
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to remove native script");
        } else {
            debug!("Native script removed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Page-load readiness gate.
//!
//! ```text
//!            arm()               release()
//! NotLoaded ───────► Loading ───────────────► Loaded
//!                      ▲                        │
//!                      └──────── arm() ─────────┘
//! ```
//!
//! `arm` installs a fresh single-slot gate; `release` opens it and
//! disarms. While no gate is armed every wait succeeds immediately.
//! Opening is sticky for the gate's lifetime, so any number of waiters on
//! the same load observe it (peek semantics rather than consuming a
//! permit).

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

// ============================================================================
// ReadinessState
// ============================================================================

/// Load state of the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessState {
    /// Nothing has been loaded yet.
    #[default]
    NotLoaded,
    /// A navigation is in flight.
    Loading,
    /// The current navigation reached its first visible paint.
    Loaded,
}

// ============================================================================
// Gate
// ============================================================================

/// One navigation's gate.
#[derive(Debug, Default)]
struct Gate {
    open: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn open(&self) {
        *self.open.lock() = true;
        self.opened.notify_all();
    }

    fn is_open(&self) -> bool {
        *self.open.lock()
    }

    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut open = self.open.lock();
        while !*open {
            if self.opened.wait_until(&mut open, deadline).timed_out() {
                return *open;
            }
        }
        true
    }
}

// ============================================================================
// ReadinessGate
// ============================================================================

#[derive(Debug, Default)]
struct Slot {
    state: ReadinessState,
    gate: Option<Arc<Gate>>,
}

/// Signals that the current navigation has been visually committed.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    slot: Mutex<Slot>,
}

impl ReadinessGate {
    /// Creates a gate in [`ReadinessState::NotLoaded`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a navigation: arms a closed gate.
    pub fn arm(&self) {
        let mut slot = self.slot.lock();
        slot.state = ReadinessState::Loading;
        slot.gate = Some(Arc::new(Gate::default()));
        debug!("Readiness gate armed");
    }

    /// Marks the navigation committed: opens and disarms the gate.
    pub fn release(&self) {
        let gate = {
            let mut slot = self.slot.lock();
            slot.state = ReadinessState::Loaded;
            slot.gate.take()
        };

        if let Some(gate) = gate {
            gate.open();
            debug!("Readiness gate released");
        }
    }

    /// Returns to [`ReadinessState::NotLoaded`], releasing any waiters.
    pub fn reset(&self) {
        let gate = {
            let mut slot = self.slot.lock();
            slot.state = ReadinessState::NotLoaded;
            slot.gate.take()
        };

        if let Some(gate) = gate {
            gate.open();
        }
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ReadinessState {
        self.slot.lock().state
    }

    /// Non-blocking check: `true` unless a closed gate is armed.
    #[must_use]
    pub fn try_ready(&self) -> bool {
        match self.armed() {
            Some(gate) => gate.is_open(),
            None => true,
        }
    }

    /// Waits up to `timeout` for the armed gate to open.
    ///
    /// Returns `true` immediately when nothing is armed, `false` on
    /// timeout. Never call this from the context that delivers
    /// [`ReadinessGate::release`].
    #[must_use]
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        let Some(gate) = self.armed() else {
            return true;
        };

        if gate.is_open() {
            return true;
        }

        debug!(timeout_ms = timeout.as_millis() as u64, "Waiting for page readiness");
        gate.wait(timeout)
    }

    fn armed(&self) -> Option<Arc<Gate>> {
        self.slot.lock().gate.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

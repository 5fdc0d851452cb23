//! Page loading and readiness waits.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{Error, Result};

use super::Bridge;

// ============================================================================
// Bridge - Navigation
// ============================================================================

impl Bridge {
    /// Starts loading `url` and arms the readiness gate.
    ///
    /// Returns immediately. Navigation failures are logged; an
    /// uninitialized bridge leaves the gate untouched.
    pub fn load(&self, url: &str) {
        info!(url, "Browser loading url");

        let surface = match self.surface() {
            Ok(surface) => surface,
            Err(e) => {
                error!(url, error = %e, "loadUrl failed");
                return;
            }
        };

        self.inner.gate.arm();

        let target = url.to_string();
        let posted = self.inner.ui.post(Box::new(move || {
            if let Err(e) = surface.lock().navigate(&target) {
                error!(url = %target, error = %e, "loadUrl failed");
            }
        }));

        if let Err(e) = posted {
            error!(url, error = %e, "loadUrl failed");
        }
    }

    /// Waits until the current load becomes visible, at most `timeout`.
    ///
    /// On the UI context this never blocks: it reports readiness as is.
    #[must_use]
    pub fn wait_till_loaded(&self, timeout: Duration) -> bool {
        let ready = if self.inner.ui.is_current() {
            self.inner.gate.try_ready()
        } else {
            self.inner.gate.wait_ready(timeout)
        };

        if ready {
            debug!("Browser is ready");
        } else {
            info!(timeout_ms = timeout.as_millis() as u64, "Browser failed wait ready");
        }

        ready
    }

    /// Waits with the configured default timeout.
    #[inline]
    #[must_use]
    pub fn wait_ready(&self) -> bool {
        self.wait_till_loaded(self.inner.options.wait_timeout)
    }

    /// Like [`Bridge::wait_till_loaded`], but reports a timeout as an error.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] if the surface does not exist
    /// - [`Error::Timeout`] if the page did not become visible in time
    pub fn ensure_loaded(&self, timeout: Duration) -> Result<()> {
        self.surface()?;
        if self.wait_till_loaded(timeout) {
            Ok(())
        } else {
            Err(Error::timeout("wait till loaded", timeout.as_millis() as u64))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    use crate::bridge::BridgeOptions;
    use crate::bridge::testing::{flush_ui, mock_bridge};
    use crate::surface::mock::MockState;
    use crate::surface::run_blocking;
    use crate::transport::ReadinessState;

    #[test]
    fn test_ready_before_any_load() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        bridge.initialize().unwrap();

        assert!(bridge.wait_till_loaded(Duration::ZERO));
        assert_eq!(bridge.readiness(), ReadinessState::NotLoaded);
    }

    #[test]
    fn test_load_closes_gate_until_commit() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        bridge.initialize().unwrap();

        bridge.load("http://x");
        assert!(!bridge.wait_till_loaded(Duration::ZERO));
        assert_eq!(bridge.readiness(), ReadinessState::Loading);

        flush_ui(&bridge);
        assert_eq!(*state.navigations.lock(), ["http://x"]);

        state.commit("http://x");
        assert!(bridge.wait_till_loaded(Duration::from_millis(100)));
        assert_eq!(bridge.readiness(), ReadinessState::Loaded);
    }

    #[test]
    fn test_waiter_released_by_commit_from_other_thread() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        bridge.initialize().unwrap();
        bridge.load("http://x");

        let committer = {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                state.commit("http://x");
            })
        };

        assert!(bridge.wait_till_loaded(Duration::from_secs(5)));
        committer.join().unwrap();
    }

    #[test]
    fn test_new_load_rearms_gate() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        bridge.initialize().unwrap();

        bridge.load("http://a");
        state.commit("http://a");
        assert!(bridge.wait_till_loaded(Duration::ZERO));

        bridge.load("http://b");
        assert!(!bridge.wait_till_loaded(Duration::from_millis(10)));
    }

    #[test]
    fn test_ensure_loaded_reports_timeout() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        assert!(matches!(bridge.ensure_loaded(Duration::ZERO), Err(Error::NotInitialized)));

        bridge.initialize().unwrap();
        bridge.load("http://x");
        let err = bridge.ensure_loaded(Duration::from_millis(10)).unwrap_err();
        assert!(err.is_timeout());

        state.commit("http://x");
        bridge.ensure_loaded(Duration::from_millis(10)).unwrap();
    }

    #[test]
    fn test_wait_on_ui_context_never_blocks() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());
        bridge.initialize().unwrap();
        bridge.load("http://x");

        let on_ui = bridge.clone();
        let ready = run_blocking(bridge.inner.ui.as_ref(), move || {
            on_ui.wait_till_loaded(Duration::from_secs(60))
        })
        .unwrap();
        assert!(!ready);
    }

    #[test]
    fn test_load_before_initialize_does_not_navigate() {
        let state = MockState::new();
        let bridge = mock_bridge(&state, true, BridgeOptions::new());

        bridge.load("http://x");
        assert!(state.navigations.lock().is_empty());
        assert_eq!(bridge.readiness(), ReadinessState::NotLoaded);
    }
}

//! Off-UI executor for host callbacks.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::error::Result;
use crate::transport::CallbackHandler;

// ============================================================================
// Executor
// ============================================================================

/// Runs host callbacks on tokio's blocking pool.
///
/// Either owns its runtime or borrows a handle supplied by the embedder.
pub(crate) struct Executor {
    runtime: Option<Runtime>,
    handle: Handle,
}

impl Executor {
    /// Builds an owned multi-thread runtime.
    pub(crate) fn owned(worker_threads: usize) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("bridge-io")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        debug!(worker_threads, "Callback runtime started");
        Ok(Self {
            runtime: Some(runtime),
            handle,
        })
    }

    /// Uses an existing runtime.
    pub(crate) fn from_handle(handle: Handle) -> Self {
        Self {
            runtime: None,
            handle,
        }
    }

    /// Returns the runtime handle.
    #[inline]
    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        // May run on one of the runtime's own threads.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

// ============================================================================
// Completion
// ============================================================================

/// A handler that fires at most once, from whichever path finishes first.
#[derive(Clone)]
pub(crate) struct Completion {
    handler: Arc<Mutex<Option<CallbackHandler>>>,
    executor: Handle,
}

impl Completion {
    pub(crate) fn new(handler: CallbackHandler, executor: Handle) -> Self {
        Self {
            handler: Arc::new(Mutex::new(Some(handler))),
            executor,
        }
    }

    /// Delivers `value` off the calling thread. Later calls are ignored.
    pub(crate) fn deliver(&self, value: Option<String>) {
        let handler = self.handler.lock().take();
        if let Some(handler) = handler {
            self.executor.spawn_blocking(move || handler(value));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! UI-affine execution context.
//!
//! A rendering surface must only be touched from the context that owns it.
//! [`UiContext`] abstracts that context so embedders can route jobs onto
//! their platform's main loop; [`UiThread`] is a self-contained default
//! that owns a dedicated OS thread.
//!
//! Marshaling comes in two forms:
//!
//! - [`UiContext::post`] - fire-and-forget (navigate, evaluate, destroy)
//! - [`run_blocking`] - wait for a value (create, current URL, install scripts)
//!
//! `run_blocking` runs the job inline when called from the UI context
//! itself, so it never deadlocks on re-entry. It must not be called from
//! inside an async task.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, ThreadId};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// A unit of work executed on the UI context.
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

// ============================================================================
// UiContext
// ============================================================================

/// The single execution context that owns the rendering surface.
pub trait UiContext: Send + Sync {
    /// Returns `true` when called from the UI context itself.
    fn is_current(&self) -> bool;

    /// Queues `job` for execution on the UI context.
    ///
    /// # Errors
    ///
    /// [`Error::UiUnavailable`] if the context has shut down.
    fn post(&self, job: UiJob) -> Result<()>;
}

/// Runs `f` on the UI context and waits for its result.
///
/// # Errors
///
/// - [`Error::UiUnavailable`] if the job could not be queued
/// - [`Error::ChannelClosed`] if the job was dropped or panicked
pub fn run_blocking<T, F>(ui: &dyn UiContext, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    if ui.is_current() {
        return Ok(f());
    }

    let (tx, rx) = oneshot::channel();
    ui.post(Box::new(move || {
        let _ = tx.send(f());
    }))?;

    Ok(rx.blocking_recv()?)
}

// ============================================================================
// UiThread
// ============================================================================

/// Dedicated OS thread acting as the UI context.
///
/// The thread runs until every handle is dropped. Panicking jobs are
/// logged and the loop keeps going.
pub struct UiThread {
    /// Job queue feeding the thread.
    sender: mpsc::UnboundedSender<UiJob>,
    /// Identity of the UI thread for re-entry detection.
    thread_id: ThreadId,
    /// Thread name for logging.
    name: String,
}

impl fmt::Debug for UiThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiThread")
            .field("name", &self.name)
            .field("thread_id", &self.thread_id)
            .finish_non_exhaustive()
    }
}

impl UiThread {
    /// Spawns the UI thread.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the OS refuses to create the thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<UiJob>();

        let loop_name = name.clone();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            debug!(thread = %loop_name, "UI loop started");
            while let Some(job) = receiver.blocking_recv() {
                if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                    error!(
                        thread = %loop_name,
                        panic = %panic_message(panic.as_ref()),
                        "UI job panicked"
                    );
                }
            }
            debug!(thread = %loop_name, "UI loop terminated");
        })?;

        Ok(Self {
            sender,
            thread_id: handle.thread().id(),
            name,
        })
    }

    /// Returns the thread name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl UiContext for UiThread {
    fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    fn post(&self, job: UiJob) -> Result<()> {
        self.sender.send(job).map_err(|_| Error::UiUnavailable)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

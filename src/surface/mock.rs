//! In-memory surface for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::injection::{FetchRequest, FetchedResponse, Fetcher};

use super::{
    ConsoleListener, ConsoleMessage, CookieStore, EvalCallback, MemoryCookieStore,
    NavigationListener, RenderSurface, ScriptHandle, SurfaceFactory, SurfaceSettings,
    SyntheticResponse, WebRequest,
};

// ============================================================================
// MockState
// ============================================================================

/// Everything a mock surface records, shared with the test.
#[derive(Default)]
pub(crate) struct MockState {
    pub created: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
    pub evaluations: Mutex<Vec<String>>,
    pub native_scripts: Mutex<Vec<(u64, String)>>,
    pub destroyed: AtomicBool,
    pub eval_result: Mutex<Option<String>>,
    pub fail_eval: AtomicBool,
    pub cookies: Arc<MemoryCookieStore>,
    console: Mutex<Option<ConsoleListener>>,
    navigation: Mutex<Option<Arc<dyn NavigationListener>>>,
    next_script: AtomicU64,
}

impl MockState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Emits an info-level console line as the page would.
    pub(crate) fn emit_console(&self, text: &str) -> bool {
        self.emit(&ConsoleMessage::info(text))
    }

    pub(crate) fn emit(&self, message: &ConsoleMessage) -> bool {
        let listener = self.console.lock().clone();
        listener.is_some_and(|listener| listener(message))
    }

    /// Signals that `url` became visible.
    pub(crate) fn commit(&self, url: &str) {
        let listener = self.navigation.lock().clone();
        if let Some(listener) = listener {
            listener.on_commit_visible(url);
        }
    }

    /// Offers a request to the navigation listener.
    pub(crate) fn request(&self, request: &WebRequest) -> Option<SyntheticResponse> {
        let listener = self.navigation.lock().clone();
        listener.and_then(|listener| listener.intercept_request(request))
    }

    pub(crate) fn native_sources(&self) -> Vec<String> {
        self.native_scripts
            .lock()
            .iter()
            .map(|(_, source)| source.clone())
            .collect()
    }
}

// ============================================================================
// MockSurface
// ============================================================================

pub(crate) struct MockSurface {
    state: Arc<MockState>,
    native: bool,
    url: Option<String>,
}

struct MockHandle {
    state: Arc<MockState>,
    id: u64,
}

impl ScriptHandle for MockHandle {
    fn remove(self: Box<Self>) -> Result<()> {
        self.state.native_scripts.lock().retain(|(id, _)| *id != self.id);
        Ok(())
    }
}

impl RenderSurface for MockSurface {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.state.navigations.lock().push(url.to_string());
        self.url = Some(url.to_string());
        Ok(())
    }

    fn evaluate(&mut self, script: &str, on_result: EvalCallback) -> Result<()> {
        self.state.evaluations.lock().push(script.to_string());
        if self.state.fail_eval.load(Ordering::SeqCst) {
            return Err(Error::surface("evaluation rejected"));
        }
        on_result(self.state.eval_result.lock().clone());
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn user_agent(&self) -> String {
        "MockSurface/1.0".to_string()
    }

    fn set_console_listener(&mut self, listener: ConsoleListener) {
        *self.state.console.lock() = Some(listener);
    }

    fn set_navigation_listener(&mut self, listener: Arc<dyn NavigationListener>) {
        *self.state.navigation.lock() = Some(listener);
    }

    fn supports_pre_document_scripts(&self) -> bool {
        self.native
    }

    fn add_pre_document_script(
        &mut self,
        script: &str,
        _origins: &[String],
    ) -> Result<Box<dyn ScriptHandle>> {
        if !self.native {
            return Err(Error::surface("pre-document scripts unsupported"));
        }
        let id = self.state.next_script.fetch_add(1, Ordering::SeqCst);
        self.state.native_scripts.lock().push((id, script.to_string()));
        Ok(Box::new(MockHandle {
            state: Arc::clone(&self.state),
            id,
        }))
    }

    fn cookie_store(&self) -> Arc<dyn CookieStore> {
        self.state.cookies.clone()
    }

    fn destroy(&mut self) {
        *self.state.console.lock() = None;
        *self.state.navigation.lock() = None;
        self.state.destroyed.store(true, Ordering::SeqCst);
    }
}

/// Factory producing mock surfaces that share `state`.
pub(crate) fn factory(state: Arc<MockState>, native: bool) -> impl SurfaceFactory {
    move |_: &SurfaceSettings| -> Result<Box<dyn RenderSurface>> {
        state.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSurface {
            state: Arc::clone(&state),
            native,
            url: None,
        }))
    }
}

// ============================================================================
// StaticFetcher
// ============================================================================

/// Serves the same HTML document for every request.
pub(crate) struct StaticFetcher {
    pub html: String,
    pub seen: Mutex<Vec<FetchRequest>>,
}

impl StaticFetcher {
    pub(crate) fn new(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: html.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse> {
        self.seen.lock().push(request.clone());
        Ok(FetchedResponse {
            status: 200,
            reason: "OK".to_string(),
            headers: vec![("Content-Type".into(), "text/html; charset=utf-8".into())],
            body: self.html.clone().into_bytes(),
        })
    }
}

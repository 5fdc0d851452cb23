//! End-to-end bridge flows against a scripted surface.
//!
//! Everything here goes through the public API only: the surface is
//! implemented the way an embedder would implement it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use webview_bridge::injection::{FetchRequest, FetchedResponse};
use webview_bridge::surface::{ConsoleListener, EvalCallback};
use webview_bridge::{
    Bridge, BridgeOptions, ConsoleMessage, CookieStore, DiagnosticSink, Error, Fetcher, Mechanism,
    MemoryCookieStore, NavigationListener, RenderSurface, Result, ScriptHandle, SurfaceSettings,
    WebRequest,
};

// ============================================================================
// Scripted Surface
// ============================================================================

#[derive(Default)]
struct Page {
    console: Mutex<Option<ConsoleListener>>,
    navigation: Mutex<Option<Arc<dyn NavigationListener>>>,
    evaluated: Mutex<Vec<String>>,
    destroyed: AtomicBool,
    settings: Mutex<Option<SurfaceSettings>>,
    cookies: Arc<MemoryCookieStore>,
}

impl Page {
    fn say(&self, text: &str) -> bool {
        let listener = self.console.lock().clone();
        listener.is_some_and(|listener| listener(&ConsoleMessage::info(text)))
    }

    fn commit(&self, url: &str) {
        let listener = self.navigation.lock().clone();
        if let Some(listener) = listener {
            listener.on_commit_visible(url);
        }
    }

    fn offer(&self, request: &WebRequest) -> Option<webview_bridge::SyntheticResponse> {
        let listener = self.navigation.lock().clone();
        listener.and_then(|listener| listener.intercept_request(request))
    }
}

struct ScriptedSurface {
    page: Arc<Page>,
    url: Option<String>,
}

impl RenderSurface for ScriptedSurface {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.url = Some(url.to_string());
        Ok(())
    }

    fn evaluate(&mut self, script: &str, on_result: EvalCallback) -> Result<()> {
        self.page.evaluated.lock().push(script.to_string());
        on_result(Some(r#""evaluated""#.to_string()));
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn user_agent(&self) -> String {
        "ScriptedSurface/1.0".to_string()
    }

    fn set_console_listener(&mut self, listener: ConsoleListener) {
        *self.page.console.lock() = Some(listener);
    }

    fn set_navigation_listener(&mut self, listener: Arc<dyn NavigationListener>) {
        *self.page.navigation.lock() = Some(listener);
    }

    fn supports_pre_document_scripts(&self) -> bool {
        false
    }

    fn add_pre_document_script(
        &mut self,
        _script: &str,
        _origins: &[String],
    ) -> Result<Box<dyn ScriptHandle>> {
        Err(Error::surface("unsupported"))
    }

    fn cookie_store(&self) -> Arc<dyn CookieStore> {
        self.page.cookies.clone()
    }

    fn destroy(&mut self) {
        self.page.destroyed.store(true, Ordering::SeqCst);
    }
}

struct Origin;

impl Fetcher for Origin {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse> {
        assert_eq!(request.user_agent, "ScriptedSurface/1.0");
        Ok(FetchedResponse {
            status: 200,
            reason: String::new(),
            headers: vec![
                ("Content-Type".into(), "text/html".into()),
                ("Set-Cookie".into(), "session=1".into()),
            ],
            body: b"<html><head></head><body>origin</body></html>".to_vec(),
        })
    }
}

#[derive(Default)]
struct Sink {
    lines: Mutex<Vec<String>>,
}

impl DiagnosticSink for Sink {
    fn info(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }

    fn error(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bridge(page: &Arc<Page>, sink: Arc<Sink>) -> Bridge {
    init_logging();
    let page = Arc::clone(page);
    Bridge::builder()
        .surface_factory(move |settings: &SurfaceSettings| -> Result<Box<dyn RenderSurface>> {
            *page.settings.lock() = Some(*settings);
            Ok(Box::new(ScriptedSurface {
                page: Arc::clone(&page),
                url: None,
            }))
        })
        .fetcher(Arc::new(Origin))
        .diagnostics(sink)
        .options(BridgeOptions::new().with_wait_timeout(Duration::from_millis(500)))
        .build()
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_load_wait_and_callback() {
    let page = Arc::new(Page::default());
    let bridge = bridge(&page, Arc::default());
    bridge.initialize().unwrap();
    assert_eq!(page.settings.lock().map(|s| s.javascript_enabled), Some(true));

    bridge.load("http://x");
    assert!(!bridge.wait_till_loaded(Duration::ZERO));
    page.commit("http://x");
    assert!(bridge.wait_till_loaded(Duration::from_millis(100)));

    let (tx, rx) = mpsc::channel();
    bridge.run_with_callback("1+1", "c1", move |value| tx.send(value).unwrap());
    assert!(page.say(r#"__GJ__:{"t":"cb","id":"c1","result":"\"2\""}"#));

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap().as_deref(), Some("2"));
    assert_eq!(bridge.get_current_url().unwrap().as_deref(), Some("http://x"));
}

#[test]
fn test_run_with_return_decodes_result() {
    let page = Arc::new(Page::default());
    let bridge = bridge(&page, Arc::default());
    bridge.initialize().unwrap();

    let (tx, rx) = mpsc::channel();
    bridge.run_with_return("'evaluated'", move |value| tx.send(value).unwrap());
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(2)).unwrap().as_deref(),
        Some("evaluated")
    );
    assert_eq!(*page.evaluated.lock(), ["'evaluated'"]);
}

#[test]
fn test_fallback_document_rewrite() {
    let page = Arc::new(Page::default());
    let bridge = bridge(&page, Arc::default());
    bridge.initialize().unwrap();
    assert_eq!(bridge.injection_mechanism(), Mechanism::Fallback);

    let id = bridge.add_script_on_load("window.hooked = 1;").unwrap();
    let response = page.offer(&WebRequest::document("https://site.test/")).unwrap();
    let body = String::from_utf8(response.body).unwrap();
    assert!(body.contains("window.hooked = 1;"));
    assert!(body.ends_with("</head><body>origin</body></html>"));
    assert_eq!(response.reason, "OK");
    assert_eq!(page.cookies.cookie("https://site.test/").as_deref(), Some("session=1"));

    assert!(bridge.remove_script_on_load(&id.to_string()));
    let response = page.offer(&WebRequest::document("https://site.test/")).unwrap();
    assert!(!String::from_utf8(response.body).unwrap().contains("window.hooked"));

    bridge.clear_scripts_on_load();
    assert!(page.offer(&WebRequest::document("https://site.test/")).is_none());
}

#[test]
fn test_page_logs_reach_diagnostics() {
    let page = Arc::new(Page::default());
    let sink = Arc::new(Sink::default());
    let bridge = bridge(&page, Arc::clone(&sink));
    bridge.initialize().unwrap();

    assert!(!page.say("plain output"));
    assert!(page.say(r#"__GJ__:{"t":"log","msg":"from bridge"}"#));

    let lines = sink.lines.lock().clone();
    assert_eq!(lines, ["Browser Log:plain output", "from bridge"]);
}

#[test]
fn test_deinitialize_is_final_until_reinitialized() {
    let page = Arc::new(Page::default());
    let bridge = bridge(&page, Arc::default());
    bridge.initialize().unwrap();

    bridge.deinitialize();
    assert!(matches!(bridge.get_current_url(), Err(Error::NotInitialized)));
    assert!(matches!(
        bridge.add_script_on_load("x()"),
        Err(Error::NotInitialized)
    ));
    assert!(!bridge.remove_script_on_load("00000000-0000-4000-8000-000000000000"));

    // Destruction is queued behind earlier UI work.
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while !page.destroyed.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(page.destroyed.load(Ordering::SeqCst));

    bridge.initialize().unwrap();
    assert!(bridge.is_initialized());
}

//! Fallback injection demonstration.
//!
//! Demonstrates:
//! - Registering pre-document scripts without a native engine hook
//! - Fetching a live document and rewriting its `<head>`
//! - Cookie replication through the surface cookie store
//!
//! Usage:
//!   cargo run --example fallback_injection
//!   cargo run --example fallback_injection -- https://example.org
//!   cargo run --example fallback_injection -- --debug

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use webview_bridge::protocol::bootstrap_script;
use webview_bridge::{
    HttpFetcher, MemoryCookieStore, NetworkInterceptor, ScriptRegistry, WebRequest,
};

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_URL: &str = "https://example.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) webview-bridge-demo";

const HOOK: &str = "window.__demoHookRan = true;";

// ============================================================================
// Main
// ============================================================================

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "--debug");
    let url = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let filter = if debug { "webview_bridge=debug" } else { "webview_bridge=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Err(e) = run(&url) {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

fn run(url: &str) -> anyhow::Result<()> {
    println!("=== Fallback Injection ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Registering scripts...");
    let scripts = Arc::new(ScriptRegistry::new());
    scripts.add(&bootstrap_script())?;
    let hook_id = scripts.add(HOOK)?;
    println!("        ✓ {} scripts (hook={hook_id})\n", scripts.len());

    let cookies = Arc::new(MemoryCookieStore::new());
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(15))?);
    let interceptor =
        NetworkInterceptor::new(Arc::clone(&scripts), fetcher, cookies.clone(), USER_AGENT);

    // ========================================================================
    // Intercept
    // ========================================================================

    println!("[1] Intercepting {url}");
    let Some(response) = interceptor.intercept(&WebRequest::document(url)) else {
        bail!("{url} was passed through (not HTML, a redirect, or unreachable)");
    };
    println!(
        "    {} {} ({}; charset={})",
        response.status, response.reason, response.mime_type, response.charset
    );

    let body = String::from_utf8_lossy(&response.body);
    let hook_at = body.find(HOOK).context("hook missing from rewritten document")?;
    println!("    ✓ Hook injected at byte {hook_at}\n");

    // ========================================================================
    // Cookies
    // ========================================================================

    println!("[2] Cookies replicated: {}", cookies.len_for(url));

    // ========================================================================
    // Removal
    // ========================================================================

    println!("\n[3] Removing hook and intercepting again");
    scripts.remove(&hook_id);
    if let Some(response) = interceptor.intercept(&WebRequest::document(url)) {
        let body = String::from_utf8_lossy(&response.body);
        println!("    ✓ Hook present: {}", body.contains(HOOK));
    }

    println!("\n=== Done ===");
    Ok(())
}

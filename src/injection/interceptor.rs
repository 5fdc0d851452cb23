//! Network interception for fallback injection.
//!
//! When the surface cannot install pre-document scripts, the bridge loads
//! main-frame documents itself and rewrites them:
//!
//! 1. Only main-frame `GET` requests over http/https are considered, and
//!    only while fallback scripts are registered.
//! 2. The URL is fetched with redirects disabled, forwarding `Cookie` and
//!    `User-Agent`.
//! 3. Redirects, non-HTML and content-encoded responses pass through
//!    untouched.
//! 4. The body is decoded with its declared charset (UTF-8 otherwise), the
//!    scripts are injected after `<head>`, and the body is re-encoded.
//! 5. `Content-Length` is dropped; `Set-Cookie` values are copied into the
//!    surface's cookie store.
//!
//! Every failure resolves to pass-through. The surface then loads the
//! request on its own, without the injected scripts.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use encoding_rs::UTF_8;
use reqwest::blocking::Client;
use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::redirect::Policy;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::surface::{CookieStore, SyntheticResponse, WebRequest};

use super::html::{charset_from_content_type, inject_into_head, is_html_content_type};
use super::registry::ScriptRegistry;

// ============================================================================
// FetchRequest / FetchedResponse
// ============================================================================

/// A document fetch issued on behalf of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL.
    pub url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Cookie` header value, if any.
    pub cookie: Option<String>,
}

/// Raw response of a document fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP reason phrase (may be empty).
    ///
    /// [`HttpFetcher`] reports the canonical phrase for the status code,
    /// not the phrase the server sent. Custom fetchers may carry the
    /// upstream phrase, which is kept as is.
    pub reason: String,
    /// Response headers, duplicates preserved.
    pub headers: Vec<(String, String)>,
    /// Undecoded body.
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Returns the first value of a header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Blocking HTTP fetch primitive. Must not follow redirects.
pub trait Fetcher: Send + Sync {
    /// Fetches `request.url` with `GET`.
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse>;
}

/// [`Fetcher`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with redirects disabled and the given timeout.
    ///
    /// # Errors
    ///
    /// [`Error::Http`](crate::Error::Http) if the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchedResponse> {
        let mut builder = self
            .client
            .get(&request.url)
            .header(USER_AGENT, &request.user_agent);

        if let Some(cookie) = request.cookie.as_deref().filter(|c| !c.is_empty()) {
            builder = builder.header(COOKIE, cookie);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(FetchedResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

// ============================================================================
// NetworkInterceptor
// ============================================================================

/// Rewrites main-frame HTML to carry the registered fallback scripts.
pub struct NetworkInterceptor {
    /// Source of fallback scripts.
    scripts: Arc<ScriptRegistry>,
    /// Fetch primitive.
    fetcher: Arc<dyn Fetcher>,
    /// Surface cookie store.
    cookies: Arc<dyn CookieStore>,
    /// Surface default user agent.
    user_agent: String,
}

impl fmt::Debug for NetworkInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkInterceptor")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl NetworkInterceptor {
    /// Creates an interceptor.
    #[must_use]
    pub fn new(
        scripts: Arc<ScriptRegistry>,
        fetcher: Arc<dyn Fetcher>,
        cookies: Arc<dyn CookieStore>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            scripts,
            fetcher,
            cookies,
            user_agent: user_agent.into(),
        }
    }

    /// Returns `true` for main-frame `GET` requests over http/https.
    #[must_use]
    pub fn is_eligible(request: &WebRequest) -> bool {
        if !request.is_main_frame || !request.method.eq_ignore_ascii_case("GET") {
            return false;
        }

        Url::parse(&request.url)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    /// Returns a rewritten response, or `None` to let the surface load
    /// the request itself.
    pub fn intercept(&self, request: &WebRequest) -> Option<SyntheticResponse> {
        if !Self::is_eligible(request) {
            return None;
        }

        let scripts = self.scripts.fallback_scripts();
        if scripts.is_empty() {
            return None;
        }

        debug!(url = %request.url, "Intercepting main-frame document");

        match self.fetch_and_rewrite(request, &scripts.join("\n")) {
            Ok(response) => response,
            Err(e) if e.is_pass_through() => {
                debug!(url = %request.url, error = %e, "Interception failed, passing through");
                None
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Interception failed, passing through");
                None
            }
        }
    }

    fn fetch_and_rewrite(&self, request: &WebRequest, js: &str) -> Result<Option<SyntheticResponse>> {
        let cookie = request
            .header("Cookie")
            .map(str::to_string)
            .or_else(|| self.cookies.cookie(&request.url));
        let user_agent = request
            .header("User-Agent")
            .map_or_else(|| self.user_agent.clone(), str::to_string);

        let fetched = self.fetcher.fetch(&FetchRequest {
            url: request.url.clone(),
            user_agent,
            cookie,
        })?;

        if let Some(coding) = fetched.header("Content-Encoding")
            && !coding.trim().eq_ignore_ascii_case("identity")
        {
            return Err(Error::intercept(format!("cannot rewrite {coding}-encoded body")));
        }

        let Some(response) = rewrite_response(fetched, js) else {
            debug!(url = %request.url, "Response not rewritable, passing through");
            return Ok(None);
        };

        for set_cookie in response.header_values("Set-Cookie") {
            if let Err(e) = self.cookies.set_cookie(&request.url, set_cookie) {
                debug!(error = %e, "Failed to store cookie");
            }
        }
        if let Err(e) = self.cookies.flush() {
            debug!(error = %e, "Failed to flush cookies");
        }

        Ok(Some(response))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Injects `js` into a fetched HTML response.
///
/// Returns `None` for redirects, non-HTML content and charsets that
/// cannot be encoded back (UTF-16 and `replacement`).
#[must_use]
pub fn rewrite_response(fetched: FetchedResponse, js: &str) -> Option<SyntheticResponse> {
    if (300..=399).contains(&fetched.status) {
        return None;
    }

    let content_type = fetched.header("Content-Type").unwrap_or_default().to_string();
    if !is_html_content_type(&content_type) {
        return None;
    }

    let encoding = charset_from_content_type(&content_type).unwrap_or(UTF_8);
    if encoding.output_encoding() != encoding {
        return None;
    }

    let (html, _) = encoding.decode_without_bom_handling(&fetched.body);
    let injected = inject_into_head(&html, js);
    let (body, _, _) = encoding.encode(&injected);

    let mime_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let reason = if fetched.reason.trim().is_empty() {
        "OK".to_string()
    } else {
        fetched.reason
    };

    let headers = fetched
        .headers
        .into_iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"))
        .collect();

    Some(SyntheticResponse {
        status: fetched.status,
        reason,
        mime_type,
        charset: encoding.name().to_string(),
        headers,
        body: body.into_owned(),
    })
}

// ============================================================================
// Tests
// ============================================================================

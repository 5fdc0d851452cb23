//! Cookie store abstraction.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// CookieStore
// ============================================================================

/// The platform cookie jar backing a surface.
pub trait CookieStore: Send + Sync {
    /// Returns the `Cookie` header value for `url`.
    fn cookie(&self, url: &str) -> Option<String>;

    /// Stores one `Set-Cookie` header value received for `url`.
    fn set_cookie(&self, url: &str, set_cookie: &str) -> Result<()>;

    /// Persists pending writes.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// MemoryCookieStore
// ============================================================================

/// Host-scoped in-memory cookie jar.
///
/// Keeps only `name=value` pairs per host; attributes such as `Path` and
/// `Expires` are ignored.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    jar: Mutex<FxHashMap<String, Vec<(String, String)>>>,
}

impl MemoryCookieStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cookies stored for the host of `url`.
    #[must_use]
    pub fn len_for(&self, url: &str) -> usize {
        host_of(url)
            .ok()
            .and_then(|host| self.jar.lock().get(&host).map(Vec::len))
            .unwrap_or(0)
    }
}

impl CookieStore for MemoryCookieStore {
    fn cookie(&self, url: &str) -> Option<String> {
        let host = host_of(url).ok()?;
        let jar = self.jar.lock();
        let cookies = jar.get(&host)?;
        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }

    fn set_cookie(&self, url: &str, set_cookie: &str) -> Result<()> {
        let host = host_of(url)?;
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::invalid_argument(format!("malformed cookie: {set_cookie}")))?;

        let name = name.trim().to_string();
        let value = value.trim().to_string();

        let mut jar = self.jar.lock();
        let cookies = jar.entry(host).or_default();
        match cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => cookies.push((name, value)),
        }
        Ok(())
    }
}

fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| Error::invalid_argument(e.to_string()))?;
    parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::invalid_argument(format!("url has no host: {url}")))
}

// ============================================================================
// Tests
// ============================================================================

//! Value types exchanged with a rendering surface.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ConsoleLevel
// ============================================================================

/// Severity of a page console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleLevel {
    /// `console.debug`.
    Debug,
    /// `console.log`.
    #[default]
    Log,
    /// `console.info`.
    Info,
    /// `console.warn`.
    Warning,
    /// `console.error`.
    Error,
}

impl ConsoleLevel {
    /// Returns the level name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Log => "log",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ConsoleMessage
// ============================================================================

/// A message written to the page console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    /// Severity.
    pub level: ConsoleLevel,
    /// Message text as reported by the engine.
    pub text: String,
    /// Source line number (0 when unknown).
    pub line: u32,
}

impl ConsoleMessage {
    /// Creates a console message.
    #[inline]
    #[must_use]
    pub fn new(level: ConsoleLevel, text: impl Into<String>, line: u32) -> Self {
        Self {
            level,
            text: text.into(),
            line,
        }
    }

    /// Creates an info-level message, the level bridge messages are sent at.
    #[inline]
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Info, text, 0)
    }
}

// ============================================================================
// WebRequest
// ============================================================================

/// A request the surface is about to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    /// Absolute request URL.
    pub url: String,

    /// HTTP method (GET, POST, etc.).
    pub method: String,

    /// Whether the request loads the top-level document.
    pub is_main_frame: bool,

    /// Request headers in the order the engine reported them.
    pub headers: Vec<(String, String)>,
}

impl WebRequest {
    /// Creates a main-frame GET request without headers.
    #[must_use]
    pub fn document(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            is_main_frame: true,
            headers: Vec::new(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Marks the request as a subresource or subframe load.
    #[must_use]
    pub fn subresource(mut self) -> Self {
        self.is_main_frame = false;
        self
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

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
// SyntheticResponse
// ============================================================================

/// A response handed back to the surface instead of a network load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResponse {
    /// HTTP status code.
    pub status: u16,

    /// HTTP reason phrase.
    pub reason: String,

    /// MIME type of the body.
    pub mime_type: String,

    /// Name of the body's character encoding.
    pub charset: String,

    /// Response headers.
    pub headers: Vec<(String, String)>,

    /// Encoded body.
    pub body: Vec<u8>,
}

impl SyntheticResponse {
    /// Returns all values of a header (case-insensitive).
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

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
// SurfaceSettings
// ============================================================================

/// Settings applied to a surface when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSettings {
    /// Enable page JavaScript.
    pub javascript_enabled: bool,

    /// Block image loads.
    pub block_network_images: bool,

    /// Block all network loads.
    pub block_network_loads: bool,

    /// Allow `content://`-style provider access.
    pub allow_content_access: bool,

    /// Allow `file://` access.
    pub allow_file_access: bool,
}

impl SurfaceSettings {
    /// Creates the default settings: scripts on, network on, local access off.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            javascript_enabled: true,
            block_network_images: false,
            block_network_loads: false,
            allow_content_access: false,
            allow_file_access: false,
        }
    }
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

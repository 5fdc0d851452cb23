//! Type-safe identifiers.
//!
//! | Type | Source | Format |
//! |------|--------|--------|
//! | [`ScriptId`] | generated on registration | UUID v4 |
//! | [`CallbackId`] | chosen by the host | any string |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ScriptId
// ============================================================================

/// Identifier of a script registered to run before page scripts.
///
/// Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId(Uuid);

impl ScriptId {
    /// Generates a fresh identifier.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier previously handed to the host.
    ///
    /// Returns `None` for blank or malformed input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScriptId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ============================================================================
// CallbackId
// ============================================================================

/// Correlation id matching a pending callback to its completion message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(String);

impl CallbackId {
    /// Creates a callback id from any string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallbackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CallbackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

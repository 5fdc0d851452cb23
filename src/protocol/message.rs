//! Console bridge message types.
//!
//! # Format
//!
//! ```text
//! __GJ__:{"t":"cb","id":"c1","result":"\"2\""}
//! __GJ__:{"t":"log","msg":"hello"}
//! ```
//!
//! A `cb` result is itself a JSON-encoded string produced by the page and
//! is decoded with [`decode_js_string`] before delivery.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{from_str, to_string};

use crate::error::{Error, Result};
use crate::identifiers::CallbackId;

// ============================================================================
// Constants
// ============================================================================

/// Literal prefix marking a console line as bridge traffic.
pub const BRIDGE_PREFIX: &str = "__GJ__:";

/// Tag of a callback completion.
const TAG_CALLBACK: &str = "cb";

/// Tag of a forwarded log line.
const TAG_LOG: &str = "log";

// ============================================================================
// WireMessage
// ============================================================================

/// Loosely typed wire shape; unknown tags must still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireMessage {
    t: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    msg: Option<String>,
}

// ============================================================================
// BridgeMessage
// ============================================================================

/// A decoded bridge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    /// Completion of a pending callback.
    Callback {
        /// Correlation id chosen by the host.
        id: CallbackId,
        /// JSON-encoded result payload.
        result: Option<String>,
    },

    /// Log line forwarded from the page.
    Log {
        /// Log text.
        msg: String,
    },

    /// Recognized envelope the bridge does not act on
    /// (unknown tag, or a callback without an id).
    Ignored {
        /// The message tag.
        tag: String,
    },
}

impl BridgeMessage {
    /// Decodes the JSON payload that follows [`BRIDGE_PREFIX`].
    ///
    /// # Errors
    ///
    /// [`Error::Json`] if the payload is not a bridge envelope.
    pub fn decode(payload: &str) -> Result<Self> {
        let wire: WireMessage = from_str(payload)?;

        let message = match wire.t.as_str() {
            TAG_CALLBACK => match wire.id {
                Some(id) => Self::Callback {
                    id: CallbackId::new(id),
                    result: wire.result,
                },
                None => Self::Ignored { tag: wire.t },
            },
            TAG_LOG => Self::Log {
                msg: wire.msg.unwrap_or_default(),
            },
            _ => Self::Ignored { tag: wire.t },
        };

        Ok(message)
    }

    /// Encodes the message as compact JSON (without prefix).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for [`BridgeMessage::Ignored`].
    pub fn encode(&self) -> Result<String> {
        let wire = match self {
            Self::Callback { id, result } => WireMessage {
                t: TAG_CALLBACK.to_string(),
                id: Some(id.as_str().to_string()),
                result: result.clone(),
                msg: None,
            },
            Self::Log { msg } => WireMessage {
                t: TAG_LOG.to_string(),
                msg: Some(msg.clone()),
                ..Default::default()
            },
            Self::Ignored { tag } => {
                return Err(Error::invalid_argument(format!(
                    "cannot encode ignored message: {tag}"
                )));
            }
        };
        Ok(to_string(&wire)?)
    }

    /// Encodes the message as a full console line.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessage::encode`].
    pub fn to_console_line(&self) -> Result<String> {
        Ok(format!("{BRIDGE_PREFIX}{}", self.encode()?))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Trims the text and removes one pair of surrounding double quotes.
#[must_use]
pub fn normalize_console_text(raw: &str) -> &str {
    let s = raw.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Returns the JSON payload of a bridge line, or `None` for ordinary output.
#[must_use]
pub fn bridge_payload(raw: &str) -> Option<&str> {
    normalize_console_text(raw).strip_prefix(BRIDGE_PREFIX)
}

/// Decodes a JSON `string | null` produced by the page.
///
/// # Errors
///
/// [`Error::Decode`] if `raw` is not a JSON string or `null`.
pub fn decode_js_string(raw: &str) -> Result<Option<String>> {
    from_str::<Option<String>>(raw).map_err(|e| Error::decode(format!("{e}: {raw}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_callback() {
        let msg = BridgeMessage::decode(r#"{"t":"cb","id":"abc","result":"\"hello\""}"#).unwrap();
        assert_eq!(
            msg,
            BridgeMessage::Callback {
                id: CallbackId::from("abc"),
                result: Some("\"hello\"".to_string()),
            }
        );
    }

    #[test]
    fn test_decode_callback_without_id_is_ignored() {
        let msg = BridgeMessage::decode(r#"{"t":"cb","result":"1"}"#).unwrap();
        assert_eq!(msg, BridgeMessage::Ignored { tag: "cb".into() });
    }

    #[test]
    fn test_decode_log_defaults_empty() {
        let msg = BridgeMessage::decode(r#"{"t":"log"}"#).unwrap();
        assert_eq!(msg, BridgeMessage::Log { msg: String::new() });
    }

    #[test]
    fn test_decode_unknown_tag() {
        let msg = BridgeMessage::decode(r#"{"t":"ping","extra":1}"#).unwrap();
        assert_eq!(msg, BridgeMessage::Ignored { tag: "ping".into() });
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(BridgeMessage::decode("not json").is_err());
        assert!(BridgeMessage::decode(r#"{"id":"x"}"#).is_err());
    }

    #[test]
    fn test_console_line_matches_page_format() {
        let line = BridgeMessage::Callback {
            id: "c1".into(),
            result: Some("\"2\"".into()),
        }
        .to_console_line()
        .unwrap();
        assert_eq!(line, r#"__GJ__:{"t":"cb","id":"c1","result":"\"2\""}"#);

        let line = BridgeMessage::Log { msg: "hi".into() }.to_console_line().unwrap();
        assert_eq!(line, r#"__GJ__:{"t":"log","msg":"hi"}"#);
    }

    #[test]
    fn test_encode_ignored_fails() {
        assert!(BridgeMessage::Ignored { tag: "x".into() }.encode().is_err());
    }

    #[test]
    fn test_normalize_strips_one_quote_pair() {
        assert_eq!(normalize_console_text("  \"abc\"  "), "abc");
        assert_eq!(normalize_console_text("\"\"x\"\""), "\"x\"");
        assert_eq!(normalize_console_text("\""), "\"");
        assert_eq!(normalize_console_text("plain"), "plain");
    }

    #[test]
    fn test_bridge_payload() {
        assert_eq!(bridge_payload("__GJ__:{}"), Some("{}"));
        assert_eq!(bridge_payload("\"__GJ__:{}\""), Some("{}"));
        assert_eq!(bridge_payload("hello __GJ__:{}"), None);
    }

    #[test]
    fn test_decode_js_string() {
        assert_eq!(decode_js_string("\"2\"").unwrap().as_deref(), Some("2"));
        assert_eq!(decode_js_string("null").unwrap(), None);
        assert_eq!(
            decode_js_string(r#""a\nb""#).unwrap().as_deref(),
            Some("a\nb")
        );
        assert!(matches!(decode_js_string("2"), Err(Error::Decode { .. })));
        assert!(decode_js_string("hello").is_err());
    }
}

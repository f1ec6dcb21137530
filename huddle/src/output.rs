//! Response envelope and output formatting.
//!
//! The original transport wrapped every response in `{ok, message, data}`;
//! the envelope is kept here so JSON consumers of the CLI (and any future
//! HTTP adapter) get a stable shape. Human-readable rendering lives with
//! the CLI; this module only defines the wire value.

use serde::{Deserialize, Serialize};

/// The `{ok, message, data}` response envelope.
///
/// # Examples
///
/// ```
/// use huddle::output::Envelope;
///
/// let ok = Envelope::ok(vec![1, 2, 3]);
/// assert!(ok.ok);
/// assert_eq!(ok.data, Some(vec![1, 2, 3]));
///
/// let err: Envelope<()> = Envelope::error("room not found");
/// assert!(!err.ok);
/// assert_eq!(err.message.as_deref(), Some("room not found"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable message; present on failure, optional on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The payload; absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wraps a successful payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            ok: true,
            message: None,
            data: Some(data),
        }
    }

    /// Wraps a successful payload with an accompanying message.
    #[must_use]
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Wraps a failure message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

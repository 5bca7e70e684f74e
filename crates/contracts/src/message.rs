//! Message - channel input
//!
//! Envelope carrying one payload plus optional string headers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message headers
///
/// Ordered string map so that equality and debug output are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeaders(BTreeMap<String, String>);

impl MessageHeaders {
    /// Create empty headers
    pub fn new() -> Self {
        Self::default()
    }

    /// Get header value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert header, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no header is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate headers in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outbound message
///
/// Built either by a [`Converter`](crate::Converter) or by [`Message::new`],
/// the generic wrapper that carries the payload verbatim with no headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<P> {
    /// Message payload
    pub payload: P,

    /// Message headers
    #[serde(default)]
    pub headers: MessageHeaders,
}

impl<P> Message<P> {
    /// Wrap a payload with empty headers
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            headers: MessageHeaders::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Borrow the payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Take the payload, discarding headers
    pub fn into_payload(self) -> P {
        self.payload
    }

    /// Transform the payload, keeping headers
    pub fn map<Q>(self, f: impl FnOnce(P) -> Q) -> Message<Q> {
        Message {
            payload: f(self.payload),
            headers: self.headers,
        }
    }
}

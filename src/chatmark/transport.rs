//! Host channel for ChatMark blocks
//!
//! The transport contract is request-in/response-out: one fully serialized
//! block goes out, one structured response comes back. The call blocks until
//! the host answers; there is no timeout or retry at this layer.

use std::io::{self, BufRead, Write};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransportError;

/// Structured response returned by the interactive host
///
/// A flat mapping from field identifier to JSON value: booleans for checkbox
/// entries, strings for text-editor entries. Absent fields are not an error;
/// widgets treat them as "no selection" / "no edit".
#[derive(Debug, Clone, Default)]
pub struct FormResponse {
    fields: serde_json::Map<String, Value>,
}

impl FormResponse {
    /// An empty response (nothing selected, nothing edited)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a response from one JSON line sent by the host
    ///
    /// A malformed or non-object line degrades to an empty response rather
    /// than failing the form.
    pub fn from_json_line(line: &str) -> Self {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(fields)) => Self { fields },
            Ok(other) => {
                warn!("Host response is not a JSON object, ignoring: {}", other);
                Self::empty()
            }
            Err(e) => {
                warn!("Host response is not valid JSON, ignoring: {}", e);
                Self::empty()
            }
        }
    }

    /// Checked state reported for a checkbox field, if present
    pub fn is_checked(&self, id: &str) -> Option<bool> {
        match self.fields.get(id) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Edited text reported for a text-editor field, if present
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.fields.get(id) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Set a field value; used by hosts and test doubles to build responses
    pub fn set(&mut self, id: impl Into<String>, value: Value) {
        self.fields.insert(id.into(), value);
    }

    /// Builder form of [`FormResponse::set`] for a checkbox field
    pub fn with_checked(mut self, id: impl Into<String>, checked: bool) -> Self {
        self.set(id, Value::Bool(checked));
        self
    }

    /// Builder form of [`FormResponse::set`] for a text field
    pub fn with_text(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(id, Value::String(text.into()));
        self
    }
}

/// A channel that can display one serialized block and return the host's
/// structured response. One outstanding round-trip at a time.
pub trait Transport {
    fn round_trip(&mut self, block: &str) -> Result<FormResponse, TransportError>;
}

/// Transport over the process's own stdio pipes
///
/// The block is written to stdout; the host answers with a single JSON line on
/// stdin. EOF before a line arrives means the channel is gone.
#[derive(Debug, Default)]
pub struct PipeTransport;

impl PipeTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for PipeTransport {
    fn round_trip(&mut self, block: &str) -> Result<FormResponse, TransportError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", block).map_err(TransportError::WriteFailed)?;
        out.flush().map_err(TransportError::WriteFailed)?;

        debug!("Sent chatmark block ({} bytes), waiting for response", block.len());

        let stdin = io::stdin();
        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(TransportError::ReadFailed)?;
        if read == 0 {
            return Err(TransportError::ChannelClosed);
        }

        Ok(FormResponse::from_json_line(line.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_line_object() {
        let response = FormResponse::from_json_line(r#"{"cb0-0": true, "ed1": "edited"}"#);
        assert_eq!(response.is_checked("cb0-0"), Some(true));
        assert_eq!(response.text("ed1"), Some("edited"));
    }

    #[test]
    fn test_from_json_line_malformed_degrades_to_empty() {
        let response = FormResponse::from_json_line("not json at all");
        assert_eq!(response.is_checked("cb0-0"), None);
        assert_eq!(response.text("ed1"), None);
    }

    #[test]
    fn test_from_json_line_non_object_degrades_to_empty() {
        let response = FormResponse::from_json_line(r#"[1, 2, 3]"#);
        assert_eq!(response.is_checked("cb0-0"), None);
    }

    #[test]
    fn test_absent_field_is_none() {
        let response = FormResponse::empty().with_checked("cb0-0", true);
        assert_eq!(response.is_checked("cb0-1"), None);
        assert_eq!(response.text("cb0-0"), None);
    }

    #[test]
    fn test_wrong_type_is_none() {
        let response = FormResponse::empty().with_text("ed1", "hello");
        assert_eq!(response.is_checked("ed1"), None);
    }

    #[test]
    fn test_empty_string_is_present() {
        let response = FormResponse::empty().with_text("ed1", "");
        assert_eq!(response.text("ed1"), Some(""));
    }
}

//! Common test utilities

#![allow(dead_code)]

use devmate::chatmark::{FormResponse, Transport};
use devmate::error::TransportError;

/// Transport double that records sent blocks and replies with a fixed response
pub struct MockTransport {
    pub response: FormResponse,
    pub sent: Vec<String>,
}

impl MockTransport {
    pub fn new(response: FormResponse) -> Self {
        Self {
            response,
            sent: Vec::new(),
        }
    }

    /// A transport whose host never selects or edits anything
    pub fn silent() -> Self {
        Self::new(FormResponse::empty())
    }
}

impl Transport for MockTransport {
    fn round_trip(&mut self, block: &str) -> Result<FormResponse, TransportError> {
        self.sent.push(block.to_string());
        Ok(self.response.clone())
    }
}

/// Transport double whose channel is already gone
pub struct BrokenTransport;

impl Transport for BrokenTransport {
    fn round_trip(&mut self, _block: &str) -> Result<FormResponse, TransportError> {
        Err(TransportError::ChannelClosed)
    }
}

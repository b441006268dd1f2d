//! Settlement-layer client capability.
//!
//! The sequencer only needs a `send(bytes) -> receipt` capability against
//! the downstream settlement layer. The real client is infrastructure
//! outside this crate; anything conforming to [`SettlementClient`] can be
//! plugged in, including the in-process [`LoopbackClient`] used by tests
//! and local wiring.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::sync::Mutex;

/// Errors that can occur submitting a payload downstream.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// The settlement layer refused or failed to accept the payload.
    #[error("settlement layer rejected payload: {0}")]
    Rejected(String),
}

/// Capability interface over the external settlement layer.
///
/// The call is synchronous request/response from the core's point of view.
/// Receipts are opaque; the core never re-derives or inspects them.
pub trait SettlementClient: Send + Sync {
    /// Submits a payload, returning the settlement layer's receipt.
    fn send(&self, payload: &[u8]) -> Result<String, SettlementError>;
}

/// In-process stand-in for the settlement layer.
///
/// Issues the base64 encoding of each payload as its receipt and keeps a
/// journal of everything it has accepted, letting tests verify exactly what
/// was submitted.
#[derive(Debug, Default)]
pub struct LoopbackClient {
    sent: Mutex<Vec<String>>,
}

impl LoopbackClient {
    /// Creates a client with an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every receipt issued so far, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns the most recently issued receipt.
    pub fn last_sent(&self) -> Option<String> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl SettlementClient for LoopbackClient {
    fn send(&self, payload: &[u8]) -> Result<String, SettlementError> {
        let receipt = BASE64.encode(payload);
        self.sent.lock().unwrap().push(receipt.clone());
        Ok(receipt)
    }
}

//! Pending transaction structure and queue selection.

use crate::virtual_machine::program::Program;
use sequencer_derive::Error;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Errors raised at the transaction boundary.
#[derive(Debug, Error)]
pub enum TxError {
    /// Queue label other than `fast` or `big`.
    #[error("unknown queue kind: {0}")]
    UnknownQueueKind(String),
}

/// Selects which of the two pool queues a transaction targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QueueKind {
    /// Low-latency queue drained for small, frequent blocks.
    Fast,
    /// Bulk queue drained for large, infrequent blocks.
    Big,
}

impl QueueKind {
    /// Returns the textual label submitters use.
    pub const fn label(&self) -> &'static str {
        match self {
            QueueKind::Fast => "fast",
            QueueKind::Big => "big",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QueueKind {
    type Err = TxError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.to_ascii_lowercase().as_str() {
            "fast" => Ok(QueueKind::Fast),
            "big" => Ok(QueueKind::Big),
            _ => Err(TxError::UnknownQueueKind(label.to_string())),
        }
    }
}

/// A submitted transaction awaiting block inclusion.
///
/// Immutable once created: the pool admits it into exactly one queue, a
/// miner later drains it into a block, and it is discarded afterwards.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Submitter identity.
    pub sender: String,
    /// Submitter-chosen sequence number, capped per sender by the pool.
    pub nonce: u64,
    /// The instruction sequence this transaction contributes to a block.
    pub program: Program,
    /// Target queue.
    pub kind: QueueKind,
    /// Submission time, used for retention pruning.
    pub timestamp: SystemTime,
}

impl Tx {
    /// Creates a transaction stamped with the current wall-clock time.
    pub fn new(sender: impl Into<String>, nonce: u64, program: Program, kind: QueueKind) -> Self {
        Self {
            sender: sender.into(),
            nonce,
            program,
            kind,
            timestamp: SystemTime::now(),
        }
    }
}

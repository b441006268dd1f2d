//! Transaction pool for pending transactions awaiting block inclusion.
//!
//! Provides thread-safe storage of unconfirmed transactions across two
//! independent FIFO queues, one per block kind. Admission enforces a
//! per-sender nonce window and both admission and draining lazily prune
//! transactions older than the retention window.

use crate::core::transaction::{QueueKind, Tx};
use crate::warn;
use sequencer_derive::Error;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Maximum number of distinct pending nonces per sender per queue.
pub const NONCE_WINDOW: usize = 8;

/// How long a transaction may wait in a queue before it is discarded.
pub const RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Errors that can occur admitting a transaction.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The sender already has the maximum number of distinct nonces queued.
    #[error("nonce window exceeded for sender {sender} in {kind} queue")]
    NonceWindowExceeded { sender: String, kind: QueueKind },
}

/// The two queues, guarded together so prune-then-mutate is atomic.
#[derive(Debug, Default)]
struct Queues {
    fast: VecDeque<Tx>,
    big: VecDeque<Tx>,
}

impl Queues {
    fn select(&mut self, kind: QueueKind) -> &mut VecDeque<Tx> {
        match kind {
            QueueKind::Fast => &mut self.fast,
            QueueKind::Big => &mut self.big,
        }
    }

    /// Drops every transaction at or past the retention age, in both queues.
    fn prune(&mut self, now: SystemTime) {
        let expired = |tx: &Tx| {
            now.duration_since(tx.timestamp)
                .map_or(false, |age| age >= RETENTION)
        };
        self.fast.retain(|tx| !expired(tx));
        self.big.retain(|tx| !expired(tx));
    }
}

/// Thread-safe dual-queue pool of pending transactions.
///
/// A single pool-wide lock covers every operation, so the pruning that
/// precedes each admission or drain and the mutation itself are one atomic
/// step with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct TxPool {
    queues: Mutex<Queues>,
}

impl TxPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a transaction into the queue selected by its kind.
    ///
    /// Expired transactions are pruned from both queues first. Admission is
    /// idempotent by nonce: a sender may hold at most [`NONCE_WINDOW`]
    /// distinct nonces per queue, but re-submitting an already-queued nonce
    /// is always accepted. A rejected call leaves the queues unmodified
    /// beyond that pruning.
    pub fn admit(&self, tx: Tx) -> Result<(), PoolError> {
        let mut queues = self.queues.lock().unwrap();
        queues.prune(SystemTime::now());

        let queue = queues.select(tx.kind);
        let nonces: HashSet<u64> = queue
            .iter()
            .filter(|queued| queued.sender == tx.sender)
            .map(|queued| queued.nonce)
            .collect();
        if nonces.len() >= NONCE_WINDOW && !nonces.contains(&tx.nonce) {
            warn!(
                "nonce window exceeded: sender={} nonce={} queue={}",
                tx.sender, tx.nonce, tx.kind
            );
            return Err(PoolError::NonceWindowExceeded {
                sender: tx.sender,
                kind: tx.kind,
            });
        }

        queue.push_back(tx);
        Ok(())
    }

    /// Removes and returns up to `limit` transactions from the head of the
    /// selected queue, preserving FIFO order.
    ///
    /// Expired transactions are pruned from both queues first. Returns fewer
    /// than `limit` when the queue is shorter; the other queue is untouched.
    pub fn drain(&self, kind: QueueKind, limit: usize) -> Vec<Tx> {
        let mut queues = self.queues.lock().unwrap();
        queues.prune(SystemTime::now());

        let queue = queues.select(kind);
        let count = limit.min(queue.len());
        queue.drain(..count).collect()
    }

    /// Returns the number of transactions currently queued for `kind`.
    pub fn len(&self, kind: QueueKind) -> usize {
        let mut queues = self.queues.lock().unwrap();
        queues.select(kind).len()
    }

    /// Returns `true` if both queues are empty.
    pub fn is_empty(&self) -> bool {
        let queues = self.queues.lock().unwrap();
        queues.fast.is_empty() && queues.big.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_machine::program::Program;

    fn tx(sender: &str, nonce: u64, kind: QueueKind) -> Tx {
        Tx::new(sender, nonce, Program::new(), kind)
    }

    fn aged(sender: &str, nonce: u64, kind: QueueKind, age: Duration) -> Tx {
        let mut tx = tx(sender, nonce, kind);
        tx.timestamp = SystemTime::now() - age;
        tx
    }

    // ==================== Nonce window ====================

    #[test]
    fn ninth_distinct_nonce_rejected() {
        let pool = TxPool::new();
        for nonce in 0..8 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }

        let err = pool.admit(tx("A", 8, QueueKind::Fast)).unwrap_err();
        assert!(matches!(
            err,
            PoolError::NonceWindowExceeded {
                kind: QueueKind::Fast,
                ..
            }
        ));
        assert_eq!(pool.len(QueueKind::Fast), 8);
    }

    #[test]
    fn requeueing_existing_nonce_accepted() {
        let pool = TxPool::new();
        for nonce in 0..8 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }

        // Nonce 3 is already queued, so it does not count against the window.
        pool.admit(tx("A", 3, QueueKind::Fast))
            .expect("existing nonce is exempt");
        assert_eq!(pool.len(QueueKind::Fast), 9);
    }

    #[test]
    fn window_tracked_per_sender() {
        let pool = TxPool::new();
        for nonce in 0..8 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }
        pool.admit(tx("B", 0, QueueKind::Fast))
            .expect("other senders unaffected");
    }

    #[test]
    fn window_tracked_per_queue() {
        let pool = TxPool::new();
        for nonce in 0..8 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }
        // The same sender gets a full window in the other queue.
        for nonce in 0..8 {
            pool.admit(tx("A", nonce, QueueKind::Big))
                .expect("big queue window independent");
        }
        assert!(pool.admit(tx("A", 8, QueueKind::Big)).is_err());
    }

    // ==================== Pruning ====================

    #[test]
    fn admit_prunes_expired_before_counting() {
        let pool = TxPool::new();
        pool.admit(aged("A", 0, QueueKind::Fast, RETENTION + Duration::from_secs(3600)))
            .expect("old tx admitted");
        for nonce in 1..8 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }

        // The expired nonce 0 no longer occupies the window.
        pool.admit(tx("A", 8, QueueKind::Fast))
            .expect("expired entry freed a slot");
        assert_eq!(pool.len(QueueKind::Fast), 8);
    }

    #[test]
    fn drain_prunes_both_queues() {
        let pool = TxPool::new();
        pool.admit(aged("A", 0, QueueKind::Big, RETENTION + Duration::from_secs(1)))
            .expect("old tx admitted");
        pool.admit(tx("A", 1, QueueKind::Fast)).expect("fresh tx");

        let drained = pool.drain(QueueKind::Fast, 10);
        assert_eq!(drained.len(), 1);
        // The stale big-queue entry was pruned by the fast-queue drain.
        assert_eq!(pool.len(QueueKind::Big), 0);
    }

    #[test]
    fn boundary_age_is_pruned() {
        let pool = TxPool::new();
        pool.admit(aged("A", 0, QueueKind::Fast, RETENTION))
            .expect("tx admitted");
        assert!(pool.drain(QueueKind::Fast, 10).is_empty());
    }

    // ==================== Drain order and isolation ====================

    #[test]
    fn drain_preserves_fifo_order() {
        let pool = TxPool::new();
        for nonce in 0..5 {
            pool.admit(tx("A", nonce, QueueKind::Fast))
                .expect("within window");
        }

        let drained = pool.drain(QueueKind::Fast, 3);
        let nonces: Vec<u64> = drained.iter().map(|t| t.nonce).collect();
        assert_eq!(nonces, [0, 1, 2]);

        let rest = pool.drain(QueueKind::Fast, 10);
        let nonces: Vec<u64> = rest.iter().map(|t| t.nonce).collect();
        assert_eq!(nonces, [3, 4]);
    }

    #[test]
    fn drain_returns_fewer_when_queue_is_short() {
        let pool = TxPool::new();
        pool.admit(tx("A", 0, QueueKind::Fast)).expect("admitted");

        assert_eq!(pool.drain(QueueKind::Fast, 100).len(), 1);
        assert!(pool.drain(QueueKind::Fast, 100).is_empty());
    }

    #[test]
    fn drain_only_touches_selected_queue() {
        let pool = TxPool::new();
        pool.admit(tx("A", 0, QueueKind::Fast)).expect("admitted");
        pool.admit(tx("A", 0, QueueKind::Big)).expect("admitted");

        let drained = pool.drain(QueueKind::Fast, 10);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind, QueueKind::Fast);
        assert_eq!(pool.len(QueueKind::Big), 1);
    }

    #[test]
    fn empty_pool_operations() {
        let pool = TxPool::new();
        assert!(pool.is_empty());
        assert!(pool.drain(QueueKind::Fast, 5).is_empty());
        assert_eq!(pool.len(QueueKind::Big), 0);
    }
}

//! Block assembly from pooled transactions.

use crate::core::block::Block;
use crate::core::consensus::{BlockExecutor, Consensus, ConsensusError, VmExecutor};
use crate::core::transaction::QueueKind;
use crate::info;
use crate::network::settlement::SettlementClient;
use crate::storage::txpool::TxPool;
use crate::virtual_machine::program::Program;
use std::sync::Arc;

/// Drains pooled transactions into blocks and drives them through consensus.
pub struct Miner<C: SettlementClient, E: BlockExecutor = VmExecutor> {
    pool: Arc<TxPool>,
    consensus: Consensus<C, E>,
}

impl<C: SettlementClient, E: BlockExecutor> Miner<C, E> {
    /// Creates a miner over the given pool and consensus instance.
    pub fn new(pool: Arc<TxPool>, consensus: Consensus<C, E>) -> Self {
        Self { pool, consensus }
    }

    /// Returns the consensus instance driven by this miner.
    pub fn consensus(&self) -> &Consensus<C, E> {
        &self.consensus
    }

    /// Assembles and commits one block from the selected queue.
    ///
    /// Drains up to `max_txs` transactions of `kind` and concatenates their
    /// programs in drain order into a single block program. An empty drain
    /// still proposes and commits an empty-program block; skipping those
    /// rounds instead is a candidate refinement.
    pub fn mine(&mut self, kind: QueueKind, max_txs: usize) -> Result<String, ConsensusError> {
        let txs = self.pool.drain(kind, max_txs);
        info!("mining {} block from {} transactions", kind, txs.len());

        let mut program = Program::new();
        for tx in txs {
            program.extend(tx.program);
        }
        self.consensus.propose_and_commit(Block::new(program, kind))
    }
}

//! Replicated block execution and agreement.
//!
//! Validators are simulated in-process: every validator identity re-runs the
//! proposed block's program through the same deterministic engine, starting
//! from a fresh zero state, and the round commits only if all resulting
//! state digests are identical. This models determinism-checking rather than
//! byzantine fault tolerance; there is no quorum threshold, no signatures,
//! and no defense against malicious replicas. Real networking between
//! validators is out of scope.

use crate::core::block::Block;
use crate::core::commitment::CommitmentEncoder;
use crate::core::schedule::LeaderSchedule;
use crate::network::settlement::{SettlementClient, SettlementError};
use crate::types::hash::Hash;
use crate::virtual_machine::errors::VmError;
use crate::virtual_machine::program::Program;
use crate::virtual_machine::vm::Vm;
use crate::{info, warn};
use rayon::prelude::*;
use sequencer_derive::Error;
use std::collections::HashSet;

/// Errors that can occur constructing or running a consensus round.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Construction requires at least one validator.
    #[error("validator set is empty")]
    NoValidators,
    /// Validators produced more than one distinct state digest.
    #[error("state roots diverged: {distinct} distinct roots across {validators} validators")]
    StateDivergence { distinct: usize, validators: usize },
    /// Block execution itself failed; the block is not committable.
    #[error("block execution failed: {0}")]
    Execution(VmError),
    /// The settlement layer refused the commitment.
    #[error("commitment submission failed: {0}")]
    Settlement(SettlementError),
}

/// Per-validator block execution seam.
///
/// Implementations must be pure with respect to shared state: each call
/// starts from a fresh zero ledger state, so executions for different
/// validator identities can run in parallel.
pub trait BlockExecutor: Send + Sync {
    /// Executes `program` on behalf of `validator` and returns its state digest.
    fn state_root(&self, program: &Program, validator: &str) -> Result<Hash, VmError>;
}

/// Default executor running the real VM.
#[derive(Clone, Copy, Debug, Default)]
pub struct VmExecutor;

impl BlockExecutor for VmExecutor {
    fn state_root(&self, program: &Program, _validator: &str) -> Result<Hash, VmError> {
        Ok(Vm::run(program)?.digest())
    }
}

/// Block-at-a-time consensus over a fixed validator set.
///
/// [`propose_and_commit`](Consensus::propose_and_commit) is the sole
/// external operation. It takes `&mut self`, so calls against one instance
/// are serialized by construction.
pub struct Consensus<C: SettlementClient, E: BlockExecutor = VmExecutor> {
    validators: Vec<String>,
    schedule: LeaderSchedule,
    height: u64,
    last_leader: Option<String>,
    encoder: CommitmentEncoder<C>,
    executor: E,
}

impl<C: SettlementClient> Consensus<C, VmExecutor> {
    /// Creates a consensus instance executing blocks with the real VM.
    pub fn new(
        validators: Vec<String>,
        encoder: CommitmentEncoder<C>,
    ) -> Result<Self, ConsensusError> {
        Self::with_executor(validators, encoder, VmExecutor)
    }
}

impl<C: SettlementClient, E: BlockExecutor> Consensus<C, E> {
    /// Creates a consensus instance with a custom block executor.
    pub fn with_executor(
        validators: Vec<String>,
        encoder: CommitmentEncoder<C>,
        executor: E,
    ) -> Result<Self, ConsensusError> {
        let schedule =
            LeaderSchedule::new(validators.clone()).map_err(|_| ConsensusError::NoValidators)?;
        Ok(Self {
            validators,
            schedule,
            height: 0,
            last_leader: None,
            encoder,
            executor,
        })
    }

    /// Number of blocks committed through this instance.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Leader recorded for the most recent round, committed or not.
    pub fn last_leader(&self) -> Option<&str> {
        self.last_leader.as_deref()
    }

    /// Returns the commitment encoder, mostly for payload inspection.
    pub fn encoder(&self) -> &CommitmentEncoder<C> {
        &self.encoder
    }

    /// Runs one full round over `block`: propose, execute everywhere,
    /// require unanimous state digests, then commit downstream.
    ///
    /// On success the settlement receipt is returned and the height advances
    /// by exactly one. Any failure leaves the height untouched and nothing
    /// is submitted; retrying is the caller's decision.
    pub fn propose_and_commit(&mut self, block: Block) -> Result<String, ConsensusError> {
        // The schedule advances once per round, even if the round fails.
        let leader = self.schedule.next().unwrap_or_default();
        info!(
            "proposing {} block of {} instructions at height {}: leader={leader}",
            block.kind,
            block.instruction_count(),
            self.height
        );
        self.last_leader = Some(leader);

        let executor = &self.executor;
        let program = &block.program;
        let roots = self
            .validators
            .par_iter()
            .map(|validator| executor.state_root(program, validator))
            .collect::<Result<Vec<Hash>, VmError>>()
            .map_err(ConsensusError::Execution)?;

        let distinct: HashSet<Hash> = roots.iter().copied().collect();
        if distinct.len() != 1 {
            warn!(
                "state roots diverged at height {}: {} distinct roots",
                self.height,
                distinct.len()
            );
            return Err(ConsensusError::StateDivergence {
                distinct: distinct.len(),
                validators: self.validators.len(),
            });
        }

        let receipt = self
            .encoder
            .commit(program)
            .map_err(ConsensusError::Settlement)?;
        self.height += 1;
        info!("committed block at height {}", self.height);
        Ok(receipt)
    }
}

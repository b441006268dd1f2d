//! Core execution engine.
//!
//! Applies an instruction sequence to a [`LedgerState`], deterministically
//! and in program order. All arithmetic is checked; overflow is reported as
//! an error rather than wrapping.

use crate::virtual_machine::errors::VmError;
use crate::virtual_machine::isa::Opcode;
use crate::virtual_machine::program::{Instruction, Program};
use crate::virtual_machine::state::LedgerState;

/// Deterministic instruction executor owning a [`LedgerState`].
#[derive(Clone, Debug, Default)]
pub struct Vm {
    state: LedgerState,
}

impl Vm {
    /// Creates a VM with a zero-initialized state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current ledger state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Applies `program` to the owned state, left to right.
    ///
    /// The transition is staged on a scratch copy and committed only when
    /// every instruction succeeds, so a failing call leaves the observable
    /// state exactly as it was before.
    pub fn execute(&mut self, program: &Program) -> Result<(), VmError> {
        let mut next = self.state;
        for instruction in program {
            apply(&mut next, instruction)?;
        }
        self.state = next;
        Ok(())
    }

    /// Executes `program` from a fresh zero state and returns the result.
    ///
    /// This is the per-validator entry point: each replica re-runs a block
    /// through this and compares the resulting state digests.
    pub fn run(program: &Program) -> Result<LedgerState, VmError> {
        let mut vm = Vm::new();
        vm.execute(program)?;
        Ok(vm.state)
    }
}

/// Applies a single instruction to `state`.
fn apply(state: &mut LedgerState, instruction: &Instruction) -> Result<(), VmError> {
    let overflow = || VmError::Overflow {
        mnemonic: instruction.opcode.mnemonic(),
        operand: instruction.operand,
    };

    match instruction.opcode {
        Opcode::Buy => {
            state.balance = state
                .balance
                .checked_add(instruction.operand)
                .ok_or_else(overflow)?;
        }
        Opcode::Sell => {
            state.balance = state
                .balance
                .checked_sub(instruction.operand)
                .ok_or_else(overflow)?;
        }
        Opcode::AddLiquidity => {
            state.liquidity = state
                .liquidity
                .checked_add(instruction.operand)
                .ok_or_else(overflow)?;
        }
        Opcode::MigrateToAmm => {
            state.migrated = true;
            state.migrate_value = instruction.operand;
        }
    }
    Ok(())
}

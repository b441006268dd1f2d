//! Script parser and program compiler.
//!
//! Converts line-oriented trading scripts into executable programs in two
//! phases: [`parse`] tokenizes the source into [`Command`]s without judging
//! opcodes, and [`compile`] resolves each command against the ISA.
//!
//! # Syntax
//!
//! ```text
//! OPCODE operand
//! ```
//!
//! - One statement per line
//! - Opcodes are matched case-insensitively (`buy 5` and `BUY 5` are equal)
//! - Operands are decimal 64-bit signed integers
//! - Blank lines are ignored
//! - Anything else is a syntax error reported with its line number

use crate::virtual_machine::errors::VmError;
use crate::virtual_machine::isa::Opcode;
use crate::virtual_machine::program::{Instruction, Program};

/// A parsed but not yet validated statement.
///
/// The opcode is kept textual here so the parser stays a thin tokenizer;
/// [`compile`] is the single place unrecognized opcodes are rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Textual opcode exactly as written in the source.
    pub opcode: String,
    /// Integer operand.
    pub operand: i64,
}

/// Parses a script into commands, one per non-blank line.
///
/// Fails with [`VmError::MalformedStatement`] when a line does not have
/// exactly two whitespace-separated tokens, and [`VmError::InvalidOperand`]
/// when the second token is not a decimal integer.
pub fn parse(script: &str) -> Result<Vec<Command>, VmError> {
    let mut commands = Vec::new();

    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let [opcode, operand] = tokens.as_slice() else {
            return Err(VmError::MalformedStatement {
                line,
                text: text.to_string(),
            });
        };

        let operand: i64 = operand.parse().map_err(|_| VmError::InvalidOperand {
            line,
            text: text.to_string(),
        })?;

        commands.push(Command {
            opcode: opcode.to_string(),
            operand,
        });
    }

    Ok(commands)
}

/// Compiles commands into a program.
///
/// Instruction `i` corresponds to command `i`. Fails with
/// [`VmError::InvalidOpcode`] on the first unrecognized mnemonic; earlier
/// commands produce no observable effect in that case.
pub fn compile(commands: &[Command]) -> Result<Program, VmError> {
    commands
        .iter()
        .map(|command| {
            let opcode = Opcode::from_mnemonic(&command.opcode.to_ascii_uppercase())
                .ok_or_else(|| VmError::InvalidOpcode(command.opcode.clone()))?;
            Ok(Instruction::new(opcode, command.operand))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Program::from)
}

/// Parses and compiles a script in one step.
pub fn assemble(script: &str) -> Result<Program, VmError> {
    compile(&parse(script)?)
}

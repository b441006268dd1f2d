use sequencer_derive::Error;

/// Errors that can occur during script assembly or program execution.
#[derive(Debug, Error)]
pub enum VmError {
    /// Statement does not have the `<OPCODE> <integer>` shape.
    #[error("line {line}: malformed statement: {text}")]
    MalformedStatement { line: usize, text: String },
    /// Operand is not a valid 64-bit signed integer.
    #[error("line {line}: invalid operand in: {text}")]
    InvalidOperand { line: usize, text: String },
    /// Unrecognized opcode mnemonic during compilation.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(String),
    /// Integer arithmetic overflowed while applying an instruction.
    #[error("arithmetic overflow executing {mnemonic} {operand}")]
    Overflow {
        mnemonic: &'static str,
        operand: i64,
    },
}

//! Errors produced while assembling a source file.
use thiserror::Error;

/// Reasons a single line can fail to assemble.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum AsmError {
    /// The mnemonic is not in the opcode table.
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    /// The token is not a register, a hex address (`50h`)
    /// or a decimal immediate that fits in a byte.
    #[error("invalid operand `{0}`")]
    InvalidOperand(String),

    /// The line has text but nothing before its first comma.
    #[error("missing opcode")]
    MissingOpcode,
}

/// An [`AsmError`] tagged with the 1-based line it came from.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: AsmError,
}

impl LineError {
    pub fn new(line: usize, kind: AsmError) -> Self {
        LineError { line, kind }
    }
}

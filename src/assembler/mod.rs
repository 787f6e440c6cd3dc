//! The Assembler module is in charge of taking a
//! source file and producing one machine word per instruction line.
//!
//! It does this by implementing a simple line tokenizer
//! and a single-pass encoder backed by static opcode and
//! register tables.
//!
//! [`assemble`] is the library-level entry point and stops at the first
//! failing line. The command-line driver runs the same [`parser::Parser`]
//! through [`parser::Parser::run`] instead, so it can report every failing
//! line before giving up.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

use self::error::LineError;

/// Assembles a whole program, stopping at the first line that fails.
pub fn assemble(source: &str) -> Result<Vec<u8>, LineError> {
    parser::Parser::new(source)
        .map(|ins| -> Result<u8, LineError> {
            let ins = ins?;
            debug!("line {}: {} => 0x{:02X}", ins.line, ins, ins.assemble());
            Ok(ins.assemble())
        })
        .collect()
}

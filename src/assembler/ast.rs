//! This AST describes a single assembled line.
//!
//! Every instruction is exactly one byte: the high nibble holds the
//! opcode and the operands are ORed into the whole byte.
//! Comments are prefixed with a double slash (//) and are single-line only.
//! Instructions are delimited by newlines.
//!
//! Operands are, in order of precedence:
//!
//! ```nasm
//! a b c d e h l sp pc ; registers, lowercase only
//! 50h                 ; direct address, hex with a trailing `h`.
//!                     ; Encodes as 0x80 | address.
//!                     ; Hex digits only: `0x50h`, `+5h` and `50H` are rejected.
//! 10                  ; decimal immediate, 0-255
//! ```
//!
//! Example source file:
//!
//! ```nasm
//! mov b 10    // 0x1B
//! add c b     // 0x23
//! MOV 50h a   // 0xD0, mnemonics are case-insensitive
//! jmp 42h     // 0xE2
//! ret         // 0xC0
//! ```

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    MOV,
    ADD,
    SUB,
    MUL,
    DIV,
    AND,
    OR,
    XOR,
    NOT,
    JMP,
    CALL,
    RET,
    RETI,
    INT,
    IRET,
}

impl Opcode {
    pub const ALL: [Opcode; 15] = [
        Opcode::MOV,  Opcode::ADD, Opcode::SUB,  Opcode::MUL,
        Opcode::DIV,  Opcode::AND, Opcode::OR,   Opcode::XOR,
        Opcode::NOT,  Opcode::JMP, Opcode::CALL, Opcode::RET,
        Opcode::RETI, Opcode::INT, Opcode::IRET,
    ];

    /// Looks up a lowercase mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        use Opcode::*;
        match mnemonic {
            "mov"  => Some(MOV),
            "add"  => Some(ADD),
            "sub"  => Some(SUB),
            "mul"  => Some(MUL),
            "div"  => Some(DIV),
            "and"  => Some(AND),
            "or"   => Some(OR),
            "xor"  => Some(XOR),
            "not"  => Some(NOT),
            "jmp"  => Some(JMP),
            "call" => Some(CALL),
            "ret"  => Some(RET),
            "reti" => Some(RETI),
            "int"  => Some(INT),
            "iret" => Some(IRET),
            _      => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        use Opcode::*;
        match self {
            MOV  => "mov",
            ADD  => "add",
            SUB  => "sub",
            MUL  => "mul",
            DIV  => "div",
            AND  => "and",
            OR   => "or",
            XOR  => "xor",
            NOT  => "not",
            JMP  => "jmp",
            CALL => "call",
            RET  => "ret",
            RETI => "reti",
            INT  => "int",
            IRET => "iret",
        }
    }

    /// The 4-bit opcode value.
    pub fn to_u8(&self) -> u8 {
        use Opcode::*;
        match self {
            MOV  => 0x1,
            ADD  => 0x2,
            SUB  => 0x3,
            MUL  => 0x4,
            DIV  => 0x5,
            AND  => 0x6,
            OR   => 0x7,
            XOR  => 0x8,
            NOT  => 0x9,
            JMP  => 0xA,
            CALL => 0xB,
            RET  => 0xC,
            RETI => 0xD,
            INT  => 0xE,
            IRET => 0xF,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    SP,
    PC,
}

impl Register {
    pub const ALL: [Register; 9] = [
        Register::A, Register::B, Register::C,
        Register::D, Register::E, Register::H,
        Register::L, Register::SP, Register::PC,
    ];

    /// Looks up a register by name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Register> {
        use Register::*;
        match name {
            "a"  => Some(A),
            "b"  => Some(B),
            "c"  => Some(C),
            "d"  => Some(D),
            "e"  => Some(E),
            "h"  => Some(H),
            "l"  => Some(L),
            "sp" => Some(SP),
            "pc" => Some(PC),
            _    => None,
        }
    }

    pub fn name(&self) -> &'static str {
        use Register::*;
        match self {
            A  => "a",
            B  => "b",
            C  => "c",
            D  => "d",
            E  => "e",
            H  => "h",
            L  => "l",
            SP => "sp",
            PC => "pc",
        }
    }

    /// Convert the register to its binary assembly equivalent.
    pub fn to_u8(&self) -> u8 {
        use Register::*;
        match self {
            A  => 0b0000,
            B  => 0b0001,
            C  => 0b0010,
            D  => 0b0011,
            E  => 0b0100,
            H  => 0b0101,
            L  => 0b0110,
            SP => 0b0111,
            PC => 0b1000,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Marks an operand byte as a direct memory address.
pub const MEMORY_FLAG: u8 = 0x80;

/// A classified operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Register(Register),
    /// The address as written, without the memory flag.
    Memory(u8),
    Immediate(u8),
}

impl Operand {
    /// The byte this operand contributes to an instruction.
    pub fn to_u8(&self) -> u8 {
        match self {
            Operand::Register(reg) => reg.to_u8(),
            Operand::Memory(addr)  => MEMORY_FLAG | addr,
            Operand::Immediate(v)  => *v,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Register(reg) => write!(f, "{}", reg),
            Operand::Memory(addr)  => write!(f, "{:02X}h", addr),
            Operand::Immediate(v)  => write!(f, "{}", v),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
    /// 1-based source line.
    pub line: usize,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for op in self.operands.iter() {
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}

impl Instruction {
    /// Assembles the instruction to its machine word.
    /// Operand bytes are ORed together, so overlapping bits merge.
    pub fn assemble(&self) -> u8 {
        self.operands
            .iter()
            .fold(self.opcode.to_u8() << 4, |word, op| word | op.to_u8())
    }
}

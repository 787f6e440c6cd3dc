//! The Parser module takes tokenized lines from the lexer
//! and resolves them into instructions.
use std::collections::VecDeque;
use lazy_static::lazy_static;
use regex::Regex;
use super::ast::*;
use super::error::{AsmError, LineError};
use super::lexer::{tokenize_each, RawLine};

lazy_static! {
    static ref MEMORY: Regex = Regex::new(r"^([0-9A-Fa-f]+)h$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

pub struct Parser {
    lines: VecDeque<Result<RawLine, LineError>>,
    ast:   Vec<Instruction>,
    errors: Vec<LineError>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let lines = tokenize_each(source);
        let capacity = lines.len();
        Parser{lines: VecDeque::from(lines), ast: Vec::with_capacity(capacity), errors: Vec::new()}
    }

    /// Run the parser, consuming itself and returning a list of instructions.
    /// Every failing line is logged and returned, not just the first.
    pub fn run(mut self) -> Result<Vec<Instruction>, Vec<LineError>> {
        'mainloop: loop {
            match self.next() {
                Some(Ok(ins)) => self.ast.push(ins),
                Some(Err(e)) => {
                    error!("{}", e);
                    self.errors.push(e);
                },
                None => break 'mainloop,
            };
        }

        if !self.errors.is_empty() {
            error!("Stopped assembly due to {} error(s).", self.errors.len());
            return Err(self.errors);
        }

        Ok(self.ast)
    }
}

/// Yields one encoded instruction per non-blank line, in source order.
impl Iterator for Parser {
    type Item = Result<Instruction, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines
            .pop_front()
            .map(|raw| raw.and_then(|raw| encode_line(&raw)))
    }
}

/// Resolves one tokenized line into an instruction.
pub fn encode_line(raw: &RawLine) -> Result<Instruction, LineError> {
    encode(&raw.mnemonic, raw.operands.as_slice(), raw.line)
        .map_err(|e| LineError::new(raw.line, e))
}

fn encode<S: AsRef<str>>(mnemonic: &str, operands: &[S], line: usize) -> Result<Instruction, AsmError> {
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AsmError::UnknownOpcode(mnemonic.to_owned()))?;

    let operands = operands
        .iter()
        .map(|op| classify_operand(op.as_ref()))
        .collect::<Result<Vec<Operand>, AsmError>>()?;

    Ok(Instruction { opcode, operands, line })
}

/// Classifies an operand. The first matching rule wins:
/// register name, then `XXh` hex address, then decimal immediate.
pub fn classify_operand(token: &str) -> Result<Operand, AsmError> {
    if let Some(reg) = Register::from_name(token) {
        return Ok(Operand::Register(reg));
    }

    let invalid = || AsmError::InvalidOperand(token.to_owned());

    // A trailing `h` commits to the address rule.
    if token.ends_with('h') {
        return MEMORY
            .captures(token)
            .and_then(|caps| u8::from_str_radix(&caps[1], 16).ok())
            .map(Operand::Memory)
            .ok_or_else(invalid);
    }

    if DECIMAL.is_match(token) {
        return u8::from_str_radix(token, 10)
            .map(Operand::Immediate)
            .map_err(|_| invalid());
    }

    Err(invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(token: &str) -> Result<Operand, AsmError> {
        Err(AsmError::InvalidOperand(token.to_owned()))
    }

    #[test]
    fn test_classify_register() {
        for reg in Register::ALL.iter() {
            assert_eq!(classify_operand(reg.name()), Ok(Operand::Register(*reg)));
        }
        // Register names are case-sensitive.
        assert_eq!(classify_operand("B"), invalid("B"));
        assert_eq!(classify_operand("Sp"), invalid("Sp"));
        // `h` is a register, never an empty address.
        assert_eq!(classify_operand("h"), Ok(Operand::Register(Register::H)));
    }

    #[test]
    fn test_classify_memory() {
        for i in 0..=u8::MAX {
            assert_eq!(classify_operand(&format!("{:x}h", i)), Ok(Operand::Memory(i)));
            assert_eq!(classify_operand(&format!("{:02X}h", i)), Ok(Operand::Memory(i)));
        }

        assert_eq!(classify_operand("50h").map(|op| op.to_u8()), Ok(0xD0));
        assert_eq!(classify_operand("0050h"), Ok(Operand::Memory(0x50)));
        // Digits-only before the suffix is still an address.
        assert_eq!(classify_operand("10h"), Ok(Operand::Memory(0x10)));

        assert_eq!(classify_operand("100h"), invalid("100h"));
        assert_eq!(classify_operand("xyzh"), invalid("xyzh"));
        assert_eq!(classify_operand("0x50h"), invalid("0x50h"));
        assert_eq!(classify_operand("+5h"), invalid("+5h"));
        assert_eq!(classify_operand("50hh"), invalid("50hh"));
        assert_eq!(classify_operand("50H"), invalid("50H"));
    }

    #[test]
    fn test_classify_immediate() {
        for i in 0..=u8::MAX {
            assert_eq!(classify_operand(&i.to_string()), Ok(Operand::Immediate(i)));
        }
        assert_eq!(classify_operand("007"), Ok(Operand::Immediate(7)));

        assert_eq!(classify_operand("256"), invalid("256"));
        assert_eq!(classify_operand("99999999999999999999"), invalid("99999999999999999999"));
        assert_eq!(classify_operand("-1"), invalid("-1"));
        assert_eq!(classify_operand("+1"), invalid("+1"));
        assert_eq!(classify_operand("1.5"), invalid("1.5"));
    }

    #[test]
    fn test_classify_invalid() {
        assert_eq!(classify_operand("xyz"), invalid("xyz"));
        assert_eq!(classify_operand("f"), invalid("f"));
        assert_eq!(classify_operand("r0"), invalid("r0"));
        assert_eq!(classify_operand(""), invalid(""));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("mov", &["b", "10"], 1).map(|i| i.assemble()), Ok(0x1B));
        assert_eq!(encode("mov", &["50h", "a"], 1).map(|i| i.assemble()), Ok(0xD0));
        assert_eq!(encode("jmp", &["42h"], 1).map(|i| i.assemble()), Ok(0xE2));
        assert_eq!(encode::<&str>("iret", &[], 1).map(|i| i.assemble()), Ok(0xF0));

        assert_eq!(encode("foo", &["a", "b"], 1), Err(AsmError::UnknownOpcode("foo".to_owned())));
        assert_eq!(encode("mov", &["xyz"], 1), Err(AsmError::InvalidOperand("xyz".to_owned())));
        // The opcode is checked before any operand.
        assert_eq!(encode("foo", &["xyz"], 1), Err(AsmError::UnknownOpcode("foo".to_owned())));
        // Operands are resolved in order.
        assert_eq!(encode("mov", &["q", "z"], 1), Err(AsmError::InvalidOperand("q".to_owned())));
    }

    #[test]
    fn test_encode_line() {
        let lines = super::super::lexer::tokenize("add c b\nMUL 3\nfoo a").unwrap();
        assert_eq!(encode_line(&lines[0]).map(|i| i.assemble()), Ok(0x23));
        assert_eq!(encode_line(&lines[1]).map(|i| i.assemble()), Ok(0x43));
        assert_eq!(
            encode_line(&lines[2]),
            Err(LineError::new(3, AsmError::UnknownOpcode("foo".to_owned())))
        );
    }

    #[test]
    fn test_run() {
        let parser = Parser::new("mov b 10\nnot a\ndiv 7fh 1");
        let ast = parser.run().unwrap();
        assert_eq!(ast.iter().map(|i| i.assemble()).collect::<Vec<u8>>(), vec![0x1B, 0x90, 0xFF]);
        assert_eq!(ast[2].line, 3);

        // All errors are collected.
        let parser = Parser::new("mov f 5\nmov b 10\nfoo\n\nxor a 300");
        assert_eq!(
            parser.run(),
            Err(vec![
                LineError::new(1, AsmError::InvalidOperand("f".to_owned())),
                LineError::new(3, AsmError::UnknownOpcode("foo".to_owned())),
                LineError::new(5, AsmError::InvalidOperand("300".to_owned())),
            ])
        );

        assert_eq!(Parser::new("").run(), Ok(vec![]));
    }

    #[test]
    fn test_run_collects_lexer_errors() {
        let parser = Parser::new(", a\nmov b 10\nfoo\n  ,b");
        assert_eq!(
            parser.run(),
            Err(vec![
                LineError::new(1, AsmError::MissingOpcode),
                LineError::new(3, AsmError::UnknownOpcode("foo".to_owned())),
                LineError::new(4, AsmError::MissingOpcode),
            ])
        );
    }

    #[test]
    fn test_parser_iterator() {
        let mut parser = Parser::new("ret\n\n// skip\n, a\njmp 42h");
        assert_eq!(parser.next().map(|r| r.map(|i| i.assemble())), Some(Ok(0xC0)));
        assert_eq!(parser.next(), Some(Err(LineError::new(4, AsmError::MissingOpcode))));
        assert_eq!(parser.next().map(|r| r.map(|i| i.assemble())), Some(Ok(0xE2)));
        assert_eq!(parser.next(), None);
    }
}

//! This lexer splits source lines into a mnemonic and raw operands.
use super::error::{AsmError, LineError};

const COMMENT: &str = "//";

/// One non-blank source line, split but not yet classified.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawLine {
    /// 1-based source line.
    pub line: usize,
    /// Always lowercase.
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// Tokenizes every line of `source`, skipping blank and comment-only lines.
/// Stops at the first line that fails.
pub fn tokenize(source: &str) -> Result<Vec<RawLine>, LineError> {
    tokenize_each(source).into_iter().collect()
}

/// Like [`tokenize`], but keeps going past failing lines so every
/// error can be reported. Results are in source order.
pub fn tokenize_each(source: &str) -> Vec<Result<RawLine, LineError>> {
    source
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| match tokenize_line(line, index + 1) {
            Ok(Some(raw)) => Some(Ok(raw)),
            Ok(None) => None,
            Err(e) => Some(Err(LineError::new(index + 1, e))),
        })
        .collect()
}

/// Only the first comma-separated field is read. The mnemonic and its
/// operands are separated by whitespace within that field; anything after
/// a comma is dropped with a warning.
pub fn tokenize_line(line: &str, line_num: usize) -> Result<Option<RawLine>, AsmError> {
    let code = match line.find(COMMENT) {
        Some(idx) => &line[..idx],
        None => line,
    };

    if code.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = code.split(',').map(str::trim);
    let first = fields.next().unwrap_or("");

    let dropped: Vec<&str> = fields.filter(|f| !f.is_empty()).collect();
    if !dropped.is_empty() {
        warn!("line {}: ignoring comma-separated field(s) {:?}", line_num, dropped);
    }

    let mut parts = first.split_whitespace();
    let mnemonic = match parts.next() {
        Some(m) => m.to_lowercase(),
        None => return Err(AsmError::MissingOpcode),
    };

    Ok(Some(RawLine {
        line: line_num,
        mnemonic,
        operands: parts.map(str::to_owned).collect(),
    }))
}

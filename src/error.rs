use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),
}

/// A statement that could not be parsed, with a 1-based position.
///
/// The column counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }

    /// Locate `kind` at the start of `cursor`, a suffix of `input`.
    pub(crate) fn at(input: &str, cursor: &str, kind: ParseErrorKind) -> Self {
        let offset = input.len() - cursor.len();
        let consumed = &input[..offset];
        let line = consumed.matches('\n').count() as u32 + 1;
        let line_start = consumed.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() as u32 + 1;
        Self::new(line, column, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A character outside `[letter digit _ .]` appeared before `=` or `:`.
    #[error("unexpected character {character:?} in variable name near {near:?}")]
    InvalidKeyCharacter { character: char, near: String },
    #[error("unterminated quoted value, missing closing {quote}")]
    UnterminatedQuote { quote: char },
    /// The statement ended without an `=` or `:` separating key and value.
    #[error("missing `=` or `:` after variable name")]
    MissingDelimiter,
    #[error("missing variable name before `=` or `:`")]
    EmptyKey,
}

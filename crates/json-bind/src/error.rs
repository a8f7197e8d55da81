//! Error types for reading and writing.

use crate::codec::TokenKind;
use crate::diagnostics::Diagnostic;

/// What went wrong while reading JSON into a bound value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected {0}")]
    UnexpectedToken(TokenKind),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: TokenKind,
    },
    #[error("cannot read {found} into {kind} `{type_name}`")]
    TypeMismatch {
        found: TokenKind,
        kind: &'static str,
        type_name: String,
    },
    #[error("null is not allowed for `{0}`")]
    NotNullable(String),
    #[error("number {number} is out of range for `{type_name}`")]
    NumberOutOfRange { number: String, type_name: String },
    #[error("`{alias}` is not a value of enum `{type_name}`")]
    UnknownAlias { alias: String, type_name: String },
    #[error("invalid binary data for `{type_name}`: {reason}")]
    InvalidBinary { type_name: String, reason: String },
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("unexpected {0} after the top-level value")]
    TrailingContent(TokenKind),
    #[error("type `{0}` is not registered")]
    UnknownType(String),
    #[error("storage does not match the descriptor of `{0}`")]
    Binding(String),
}

/// A fatal read error anchored at the token where it was detected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{row}:{column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line of the offending token.
    pub row: usize,
    /// 1-based column (in characters) of the offending token.
    pub column: usize,
    pub lexeme: Option<String>,
}

impl ParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            row: self.row,
            column: self.column,
            message: self.kind.to_string(),
            lexeme: self.lexeme.clone(),
        }
    }
}

/// Top-level error for registry, read and write operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("type `{0}` is not registered")]
    UnknownType(String),
    #[error("type `{0}` is already registered")]
    DuplicateType(String),
    #[error("type `{0}` is not a container")]
    NotAContainer(String),
    #[error("value does not match the storage of `{0}`")]
    Binding(String),
    #[error("`{name}` refers to unregistered type `{missing}`")]
    DanglingReference { name: String, missing: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl CodecError {
    /// Converts the error into a log entry. Errors without a source position
    /// are reported at row 0, column 0.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CodecError::Parse(err) => err.to_diagnostic(),
            other => Diagnostic {
                row: 0,
                column: 0,
                message: other.to_string(),
                lexeme: None,
            },
        }
    }
}

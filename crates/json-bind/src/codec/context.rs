//! Parse state and the token adapter.
//!
//! The adapter turns raw lexer tokens into [`TokenKind`]s: it recognizes the
//! literals, strips string quotes and glues a `-` onto the number that
//! immediately follows it.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, RawKind};
use crate::registry::TypeRegistry;

/// Token categories seen by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    True,
    False,
    Null,
    Number,
    String,
    OpenArray,
    CloseArray,
    OpenObject,
    CloseObject,
    Comma,
    Colon,
    /// Malformed input; the reason is kept in the context.
    Unknown,
    End,
}

impl TokenKind {
    /// Whether a JSON value can start with this token.
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::OpenArray
                | TokenKind::OpenObject
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::OpenArray => "`[`",
            TokenKind::CloseArray => "`]`",
            TokenKind::OpenObject => "`{`",
            TokenKind::CloseObject => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Unknown => "invalid token",
            TokenKind::End => "end of input",
        })
    }
}

/// State threaded through one read.
pub struct ParseContext<'a> {
    lexer: Lexer<'a>,
    pub(crate) registry: &'a TypeRegistry,
    /// Kind of the current token.
    pub token: TokenKind,
    /// Text of the current token; unquoted and unescaped for strings, signed
    /// for numbers.
    pub lexeme: String,
    pub row: usize,
    pub column: usize,
    /// Number of tokens read so far.
    pub consumed: usize,
    depth: usize,
    max_depth: usize,
    invalid: &'static str,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &'a str, registry: &'a TypeRegistry, max_depth: usize, skip_bom: bool) -> Self {
        let mut lexer = Lexer::new(src);
        if skip_bom {
            lexer.skip_bom();
        }
        lexer.set_escape_strings(true);
        Self {
            lexer,
            registry,
            token: TokenKind::End,
            lexeme: String::new(),
            row: 1,
            column: 1,
            consumed: 0,
            depth: 0,
            max_depth,
            invalid: "",
        }
    }

    /// Advances to the next token and returns its kind.
    pub fn next_token(&mut self) -> TokenKind {
        let raw = self.lexer.read_token();
        self.consumed += 1;
        self.row = raw.row;
        self.column = raw.column;
        self.lexeme = raw.lexeme;
        self.token = match raw.kind {
            RawKind::Punct('{') => TokenKind::OpenObject,
            RawKind::Punct('}') => TokenKind::CloseObject,
            RawKind::Punct('[') => TokenKind::OpenArray,
            RawKind::Punct(']') => TokenKind::CloseArray,
            RawKind::Punct(',') => TokenKind::Comma,
            RawKind::Punct(':') => TokenKind::Colon,
            RawKind::Punct('-') => self.negative(),
            RawKind::Punct(_) => self.invalid("unexpected character"),
            RawKind::Word => match self.lexeme.as_str() {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                _ => self.invalid("unknown literal"),
            },
            RawKind::Number => TokenKind::Number,
            RawKind::String => {
                if self.lexeme.len() >= 2 {
                    self.lexeme.pop();
                    self.lexeme.remove(0);
                }
                TokenKind::String
            }
            RawKind::Invalid(reason) => self.invalid(reason),
            RawKind::Eof => TokenKind::End,
        };
        self.token
    }

    fn invalid(&mut self, reason: &'static str) -> TokenKind {
        self.invalid = reason;
        TokenKind::Unknown
    }

    // The number keeps the minus position; anything else after `-` is fatal.
    fn negative(&mut self) -> TokenKind {
        let next = self.lexer.read_token();
        if next.kind == RawKind::Number && next.row == self.row && next.column == self.column + 1 {
            self.lexeme.push_str(&next.lexeme);
            return TokenKind::Number;
        }
        self.invalid("`-` must be followed by a number")
    }

    /// Error anchored at the current token.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            row: self.row,
            column: self.column,
            lexeme: (!self.lexeme.is_empty()).then(|| self.lexeme.clone()),
        }
    }

    /// Error for a token that cannot appear here.
    pub fn unexpected(&self) -> ParseError {
        self.error(match self.token {
            TokenKind::Unknown => ParseErrorKind::InvalidToken(self.invalid),
            TokenKind::End => ParseErrorKind::UnexpectedEnd,
            token => ParseErrorKind::UnexpectedToken(token),
        })
    }

    /// Error for a token other than the punctuation the grammar requires.
    pub fn expected(&self, expected: &'static str) -> ParseError {
        match self.token {
            TokenKind::Unknown | TokenKind::End => self.unexpected(),
            found => self.error(ParseErrorKind::Expected { expected, found }),
        }
    }

    pub fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::TooDeep(self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Only whitespace may follow the top-level value.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.next_token() {
            TokenKind::End => Ok(()),
            TokenKind::Unknown => Err(self.unexpected()),
            token => Err(self.error(ParseErrorKind::TrailingContent(token))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(TokenKind, String)> {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new(src, &registry, 8, true);
        let mut out = Vec::new();
        loop {
            let token = ctx.next_token();
            if token == TokenKind::End {
                return out;
            }
            out.push((token, ctx.lexeme.clone()));
        }
    }

    #[test]
    fn test_literals_and_strings() {
        let tokens = kinds(r#"[true, false, null, "a\"b"]"#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::OpenArray, "[".to_string()),
                (TokenKind::True, "true".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::False, "false".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::Null, "null".to_string()),
                (TokenKind::Comma, ",".to_string()),
                (TokenKind::String, "a\"b".to_string()),
                (TokenKind::CloseArray, "]".to_string()),
            ]
        );
    }

    #[test]
    fn test_minus_glued_to_number() {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new("  -3.5", &registry, 8, true);
        assert_eq!(ctx.next_token(), TokenKind::Number);
        assert_eq!(ctx.lexeme, "-3.5");
        assert_eq!((ctx.row, ctx.column), (1, 3));
        assert_eq!(ctx.next_token(), TokenKind::End);
    }

    #[test]
    fn test_minus_needs_adjacent_number() {
        for src in ["-}", "- 1", "-x", "-"] {
            let registry = TypeRegistry::new();
            let mut ctx = ParseContext::new(src, &registry, 8, true);
            assert_eq!(ctx.next_token(), TokenKind::Unknown, "{src}");
            assert_eq!(
                ctx.unexpected().kind,
                ParseErrorKind::InvalidToken("`-` must be followed by a number")
            );
        }
    }

    #[test]
    fn test_unknown_literal() {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new("nul", &registry, 8, true);
        assert_eq!(ctx.next_token(), TokenKind::Unknown);
        let err = ctx.unexpected();
        assert_eq!(err.kind, ParseErrorKind::InvalidToken("unknown literal"));
        assert_eq!(err.lexeme.as_deref(), Some("nul"));
    }

    #[test]
    fn test_consumed_counts_tokens() {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new("[ -1 ]", &registry, 8, true);
        ctx.next_token();
        ctx.next_token();
        assert_eq!(ctx.consumed, 2);
        ctx.next_token();
        assert_eq!(ctx.consumed, 3);
    }

    #[test]
    fn test_depth_limit() {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new("", &registry, 2, true);
        assert!(ctx.enter().is_ok());
        assert!(ctx.enter().is_ok());
        assert_eq!(ctx.enter().unwrap_err().kind, ParseErrorKind::TooDeep(2));
        ctx.leave();
        assert!(ctx.enter().is_ok());
    }

    #[test]
    fn test_trailing_content() {
        let registry = TypeRegistry::new();
        let mut ctx = ParseContext::new("1 2", &registry, 8, true);
        ctx.next_token();
        let err = ctx.expect_end().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingContent(TokenKind::Number));
        assert_eq!((err.row, err.column), (1, 3));
    }
}

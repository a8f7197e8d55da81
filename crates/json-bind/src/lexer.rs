//! Character-level JSON lexer.
//!
//! Produces raw tokens with their 1-based row and column. The lexer knows
//! nothing about JSON values: `-` is a token of its own and numbers are
//! unsigned, leaving sign handling to the token adapter in [`crate::codec`].

/// Raw token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// A run of ASCII letters and digits starting with a letter.
    Word,
    /// An unsigned number: `int frac? exp?`.
    Number,
    /// A string literal. The lexeme keeps its surrounding quotes.
    String,
    /// One of `{ } [ ] , : -`.
    Punct(char),
    /// Input that cannot start or complete a token.
    Invalid(&'static str),
    /// End of input.
    Eof,
}

/// A token together with its text and start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: RawKind,
    pub lexeme: String,
    pub row: usize,
    pub column: usize,
}

/// Streaming lexer over a string slice.
///
/// # Example
///
/// ```
/// use json_bind::lexer::{Lexer, RawKind};
///
/// let mut lexer = Lexer::new("[-1]");
/// let kinds: Vec<RawKind> = std::iter::from_fn(|| {
///     let token = lexer.read_token();
///     (token.kind != RawKind::Eof).then_some(token.kind)
/// })
/// .collect();
/// assert_eq!(
///     kinds,
///     [RawKind::Punct('['), RawKind::Punct('-'), RawKind::Number, RawKind::Punct(']')]
/// );
/// ```
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    row: usize,
    column: usize,
    escape_strings: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            row: 1,
            column: 1,
            escape_strings: false,
        }
    }

    /// Skips a leading byte order mark. Has no effect past the first byte.
    pub fn skip_bom(&mut self) {
        if self.pos == 0 && self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
    }

    /// In escape-aware mode string lexemes are unescaped and a `\"` does not
    /// end the string. Otherwise the raw text up to the next quote is returned.
    pub fn set_escape_strings(&mut self, on: bool) {
        self.escape_strings = on;
    }

    /// Current row (1-based).
    pub fn row(&self) -> usize {
        self.row
    }

    /// Current column (1-based, counted in characters).
    pub fn column(&self) -> usize {
        self.column
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
            count += 1;
        }
        count
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.bump();
        }
    }

    pub fn read_token(&mut self) -> RawToken {
        self.skip_whitespace();
        let (row, column, start) = (self.row, self.column, self.pos);
        let token = |kind: RawKind, lexeme: String| RawToken {
            kind,
            lexeme,
            row,
            column,
        };

        let Some(c) = self.peek() else {
            return token(RawKind::Eof, String::new());
        };
        match c {
            '{' | '}' | '[' | ']' | ',' | ':' | '-' => {
                self.bump();
                token(RawKind::Punct(c), c.to_string())
            }
            '"' => {
                let kind = if self.escape_strings {
                    match self.escaped_string() {
                        Ok(lexeme) => return token(RawKind::String, lexeme),
                        Err(reason) => RawKind::Invalid(reason),
                    }
                } else {
                    self.raw_string()
                };
                token(kind, self.src[start..self.pos].to_string())
            }
            '0'..='9' => {
                let kind = self.number();
                token(kind, self.src[start..self.pos].to_string())
            }
            c if c.is_ascii_alphabetic() => {
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
                    self.bump();
                }
                token(RawKind::Word, self.src[start..self.pos].to_string())
            }
            _ => {
                self.bump();
                token(
                    RawKind::Invalid("unexpected character"),
                    self.src[start..self.pos].to_string(),
                )
            }
        }
    }

    fn number(&mut self) -> RawKind {
        if self.bump() == Some('0') && matches!(self.peek(), Some('0'..='9')) {
            self.eat_digits();
            return RawKind::Invalid("leading zeros are not allowed");
        }
        self.eat_digits();
        if self.peek() == Some('.') {
            self.bump();
            if self.eat_digits() == 0 {
                return RawKind::Invalid("expected a digit after `.`");
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_digits() == 0 {
                return RawKind::Invalid("expected a digit in the exponent");
            }
        }
        RawKind::Number
    }

    fn raw_string(&mut self) -> RawKind {
        self.bump();
        loop {
            match self.bump() {
                Some('"') => return RawKind::String,
                Some(_) => {}
                None => return RawKind::Invalid("unterminated string"),
            }
        }
    }

    fn escaped_string(&mut self) -> Result<String, &'static str> {
        self.bump();
        let mut out = String::from('"');
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => out.push(self.escape()?),
                Some(c) if (c as u32) < 0x20 => return Err("control character in string"),
                Some(c) => out.push(c),
                None => return Err("unterminated string"),
            }
        }
        out.push('"');
        Ok(out)
    }

    fn escape(&mut self) -> Result<char, &'static str> {
        Ok(match self.bump() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => return self.unicode_escape(),
            Some(_) => return Err("invalid escape sequence"),
            None => return Err("unterminated string"),
        })
    }

    fn hex4(&mut self) -> Result<u32, &'static str> {
        let mut value = 0;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or("invalid unicode escape")?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn unicode_escape(&mut self) -> Result<char, &'static str> {
        let high = self.hex4()?;
        let code = match high {
            0xd800..=0xdbff => {
                if self.bump() != Some('\\') || self.bump() != Some('u') {
                    return Err("unpaired surrogate in unicode escape");
                }
                let low = self.hex4()?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err("unpaired surrogate in unicode escape");
                }
                0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
            }
            0xdc00..=0xdfff => return Err("unpaired surrogate in unicode escape"),
            _ => high,
        };
        char::from_u32(code).ok_or("invalid unicode escape")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str, escape: bool) -> Vec<RawToken> {
        let mut lexer = Lexer::new(src);
        lexer.skip_bom();
        lexer.set_escape_strings(escape);
        let mut out = Vec::new();
        loop {
            let token = lexer.read_token();
            if token.kind == RawKind::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_punctuation_and_words() {
        let kinds: Vec<RawKind> = tokens("{ } [ ] , : - true", false)
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                RawKind::Punct('{'),
                RawKind::Punct('}'),
                RawKind::Punct('['),
                RawKind::Punct(']'),
                RawKind::Punct(','),
                RawKind::Punct(':'),
                RawKind::Punct('-'),
                RawKind::Word,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let lexemes: Vec<String> = tokens("0 12 3.25 1e10 2.5E-3", false)
            .into_iter()
            .map(|t| {
                assert_eq!(t.kind, RawKind::Number);
                t.lexeme
            })
            .collect();
        assert_eq!(lexemes, vec!["0", "12", "3.25", "1e10", "2.5E-3"]);
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(
            tokens("01", false)[0].kind,
            RawKind::Invalid("leading zeros are not allowed")
        );
        assert_eq!(
            tokens("1.", false)[0].kind,
            RawKind::Invalid("expected a digit after `.`")
        );
        assert_eq!(
            tokens("1e+", false)[0].kind,
            RawKind::Invalid("expected a digit in the exponent")
        );
    }

    #[test]
    fn test_positions() {
        let toks = tokens("{\n  \"a\": 1,\n    ]", true);
        let positions: Vec<(usize, usize)> = toks.iter().map(|t| (t.row, t.column)).collect();
        assert_eq!(positions, vec![(1, 1), (2, 3), (2, 6), (2, 8), (2, 9), (3, 5)]);
    }

    #[test]
    fn test_columns_count_characters() {
        let toks = tokens("\"été\" 1", true);
        assert_eq!(toks[1].column, 7);
    }

    #[test]
    fn test_escaped_strings() {
        let toks = tokens(r#""a\"b\\c\né😀""#, true);
        assert_eq!(toks[0].kind, RawKind::String);
        assert_eq!(toks[0].lexeme, "\"a\"b\\c\né😀\"");
    }

    #[test]
    fn test_raw_strings_stop_at_next_quote() {
        let toks = tokens(r#""a\"b""#, false);
        assert_eq!(toks[0].lexeme, r#""a\""#);
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(
            tokens("\"abc", true)[0].kind,
            RawKind::Invalid("unterminated string")
        );
        assert_eq!(
            tokens("\"a\tb\"", true)[0].kind,
            RawKind::Invalid("control character in string")
        );
        assert_eq!(
            tokens(r#""\x""#, true)[0].kind,
            RawKind::Invalid("invalid escape sequence")
        );
        assert_eq!(
            tokens(r#""\ud800""#, true)[0].kind,
            RawKind::Invalid("unpaired surrogate in unicode escape")
        );
    }

    #[test]
    fn test_bom_is_skipped() {
        let toks = tokens("\u{feff}true", false);
        assert_eq!(toks.len(), 1);
        assert_eq!((toks[0].row, toks[0].column), (1, 1));
    }
}

//! Position-tagged messages collected while reading or writing.
//!
//! A log never influences control flow: the codec decides success or failure
//! on its own and merely narrates the failure here when a log is supplied.

use serde::Serialize;

/// One message with the position it refers to.
///
/// Row and column are 1-based; `0:0` marks a message without a source
/// position (unknown type names, write-side binding errors, i/o failures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub row: usize,
    pub column: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexeme: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.row > 0 {
            write!(f, "{}:{}: ", self.row, self.column)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(lexeme) = &self.lexeme {
            write!(f, " (near `{}`)", lexeme)?;
        }
        Ok(())
    }
}

/// Append-only diagnostics log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

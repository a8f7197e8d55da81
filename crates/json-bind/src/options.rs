//! Per-call configuration for reads and writes.

use crate::diagnostics::Diagnostics;

/// Default limit for nested arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for [`Codec::read`](crate::Codec::read) and friends.
///
/// # Example
///
/// ```
/// use json_bind::{Diagnostics, ReadOptions};
///
/// let mut log = Diagnostics::new();
/// let options = ReadOptions::new().diagnostics(&mut log).max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Debug)]
pub struct ReadOptions<'d> {
    /// Receives one entry when a read fails.
    pub diagnostics: Option<&'d mut Diagnostics>,
    /// Maximum nesting of arrays and objects before the read is aborted.
    pub max_depth: usize,
    /// Skip a leading UTF-8 byte order mark.
    pub skip_bom: bool,
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self {
            diagnostics: None,
            max_depth: DEFAULT_MAX_DEPTH,
            skip_bom: true,
        }
    }
}

impl<'d> ReadOptions<'d> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(mut self, log: &'d mut Diagnostics) -> Self {
        self.diagnostics = Some(log);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn skip_bom(mut self, skip: bool) -> Self {
        self.skip_bom = skip;
        self
    }
}

/// Options for [`Codec::write`](crate::Codec::write) and friends.
#[derive(Debug, Default)]
pub struct WriteOptions<'d> {
    /// Receives one entry when a write fails.
    pub diagnostics: Option<&'d mut Diagnostics>,
    /// Write reals with this many decimals instead of the shortest
    /// representation that reads back to the same value.
    pub real_precision: Option<usize>,
    /// Break lines and indent nested values by two spaces.
    pub pretty: bool,
}

impl<'d> WriteOptions<'d> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(mut self, log: &'d mut Diagnostics) -> Self {
        self.diagnostics = Some(log);
        self
    }

    pub fn real_precision(mut self, decimals: usize) -> Self {
        self.real_precision = Some(decimals);
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

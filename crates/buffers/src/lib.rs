//! Byte buffers shared by the JSON writer and the binary value protocol.
//!
//! - [`Writer`]: append-only output buffer, used for JSON text and for the
//!   transient buffer a binary value serializes itself into.
//! - [`Reader`]: bounds-checked big-endian cursor over a byte slice, the
//!   counterpart binary values use to rebuild themselves.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error returned by [`Reader`] when a read would run past the end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// `needed` bytes were requested at offset `at`, but fewer remain.
    EndOfBuffer { at: usize, needed: usize },
    /// A string read did not hold valid UTF-8.
    InvalidUtf8 { at: usize },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { at, needed } => {
                write!(f, "end of buffer: {} bytes needed at offset {}", needed, at)
            }
            BufferError::InvalidUtf8 { at } => write!(f, "invalid UTF-8 at offset {}", at),
        }
    }
}

impl std::error::Error for BufferError {}

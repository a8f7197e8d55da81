//! Base64 encoding and decoding for binary blobs embedded in JSON strings.
//!
//! Only the standard alphabet with `=` padding is supported. Decoding is
//! strict: the input must be a whole number of quartets, padding may only
//! appear at the very end, and every other byte must belong to the alphabet.
//!
//! # Example
//!
//! ```
//! use json_bind_base64::{from_base64, to_base64};
//!
//! let encoded = to_base64(b"hello world");
//! assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
//! assert_eq!(from_base64(&encoded).unwrap(), b"hello world");
//! ```

mod constants;
mod decode;
mod encode;

pub use constants::{ALPHABET, ALPHABET_BYTES, PAD};
pub use decode::{decoded_len, from_base64};
pub use encode::{encode_into, encoded_len, to_base64};

/// Error type for base64 decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base64Error {
    /// A byte outside the alphabet (or a misplaced pad) at the given offset.
    InvalidByte(usize),
    /// The input length is not a multiple of 4.
    InvalidLength(usize),
}

impl std::fmt::Display for Base64Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base64Error::InvalidByte(offset) => {
                write!(f, "invalid base64 byte at offset {}", offset)
            }
            Base64Error::InvalidLength(len) => {
                write!(f, "base64 length {} is not a multiple of 4", len)
            }
        }
    }
}

impl std::error::Error for Base64Error {}

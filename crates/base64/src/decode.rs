//! Strict standard base64 decoding.

use crate::constants::{DECODE_TABLE, INVALID, PAD};
use crate::Base64Error;

/// Number of bytes [`from_base64`] yields for a well-formed `encoded` string.
pub fn decoded_len(encoded: &str) -> usize {
    let bytes = encoded.as_bytes();
    let padding = bytes.iter().rev().take(2).filter(|&&b| b == PAD).count();
    (bytes.len() / 4 * 3).saturating_sub(padding)
}

fn sextet(bytes: &[u8], offset: usize) -> Result<u32, Base64Error> {
    match DECODE_TABLE[bytes[offset] as usize] {
        INVALID => Err(Base64Error::InvalidByte(offset)),
        v => Ok(v as u32),
    }
}

/// Decodes a padded standard base64 string.
///
/// # Errors
///
/// [`Base64Error::InvalidLength`] when the input is not made of whole quartets,
/// [`Base64Error::InvalidByte`] for any byte outside the alphabet, including a
/// `=` that is not part of the final quartet's padding.
///
/// # Example
///
/// ```
/// use json_bind_base64::{from_base64, Base64Error};
///
/// assert_eq!(from_base64("Zm9v").unwrap(), b"foo");
/// assert_eq!(from_base64("Zm9"), Err(Base64Error::InvalidLength(3)));
/// ```
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    let bytes = encoded.as_bytes();
    let length = bytes.len();
    if length % 4 != 0 {
        return Err(Base64Error::InvalidLength(length));
    }
    if length == 0 {
        return Ok(Vec::new());
    }

    let padding = if bytes[length - 2] == PAD {
        2
    } else if bytes[length - 1] == PAD {
        1
    } else {
        0
    };

    let mut out = Vec::with_capacity(decoded_len(encoded));
    let main_length = if padding > 0 { length - 4 } else { length };

    let mut i = 0;
    while i < main_length {
        let word = (sextet(bytes, i)? << 18)
            | (sextet(bytes, i + 1)? << 12)
            | (sextet(bytes, i + 2)? << 6)
            | sextet(bytes, i + 3)?;
        out.extend_from_slice(&[(word >> 16) as u8, (word >> 8) as u8, word as u8]);
        i += 4;
    }

    match padding {
        1 => {
            let word = (sextet(bytes, i)? << 18)
                | (sextet(bytes, i + 1)? << 12)
                | (sextet(bytes, i + 2)? << 6);
            out.extend_from_slice(&[(word >> 16) as u8, (word >> 8) as u8]);
        }
        2 => {
            if bytes[i + 3] != PAD {
                return Err(Base64Error::InvalidByte(i + 3));
            }
            let word = (sextet(bytes, i)? << 18) | (sextet(bytes, i + 1)? << 12);
            out.push((word >> 16) as u8);
        }
        _ => {}
    }

    Ok(out)
}

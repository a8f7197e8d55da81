//! Standard base64 encoding.

use crate::constants::{ALPHABET_BYTES, ENCODE_TABLE2, PAD};

/// Number of bytes produced when encoding `len` input bytes with padding.
pub fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Appends the padded base64 encoding of `bytes` to `out`.
///
/// Full 3-byte groups are split into two 12-bit halves and emitted through the
/// two-character table; the 1- or 2-byte tail is padded with `=`.
pub fn encode_into(bytes: &[u8], out: &mut Vec<u8>) {
    out.reserve(encoded_len(bytes.len()));

    let mut chunks = bytes.chunks_exact(3);
    for chunk in &mut chunks {
        let (o1, o2, o3) = (chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);
        let v1 = (o1 << 4) | (o2 >> 4);
        let v2 = ((o2 & 0b1111) << 8) | o3;
        out.extend_from_slice(&ENCODE_TABLE2[v1]);
        out.extend_from_slice(&ENCODE_TABLE2[v2]);
    }

    match *chunks.remainder() {
        [o1] => {
            out.extend_from_slice(&ENCODE_TABLE2[(o1 as usize) << 4]);
            out.extend_from_slice(&[PAD, PAD]);
        }
        [o1, o2] => {
            let v1 = ((o1 as usize) << 4) | ((o2 as usize) >> 4);
            let v2 = ((o2 & 0b1111) as usize) << 2;
            out.extend_from_slice(&ENCODE_TABLE2[v1]);
            out.push(ALPHABET_BYTES[v2]);
            out.push(PAD);
        }
        _ => {}
    }
}

/// Encodes a byte slice to a standard base64 string.
///
/// # Example
///
/// ```
/// use json_bind_base64::to_base64;
///
/// assert_eq!(to_base64(b"foob"), "Zm9vYg==");
/// ```
pub fn to_base64(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(encoded_len(bytes.len()));
    encode_into(bytes, &mut out);
    // The encoder only ever emits alphabet and pad bytes, all ASCII.
    out.into_iter().map(char::from).collect()
}

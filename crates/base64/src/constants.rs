/// Standard base64 alphabet.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Standard base64 alphabet as a byte array (used for byte-level operations and const evaluation).
pub const ALPHABET_BYTES: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding character.
pub const PAD: u8 = b'=';

/// Marks bytes that are not part of the alphabet in [`DECODE_TABLE`].
pub(crate) const INVALID: u8 = 0xff;

/// Reverse lookup: alphabet byte -> sextet, everything else -> [`INVALID`].
pub(crate) static DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET_BYTES[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Two-character lookup: 12-bit value -> pair of alphabet bytes.
pub(crate) static ENCODE_TABLE2: [[u8; 2]; 4096] = {
    let mut table = [[0u8; 2]; 4096];
    let mut i = 0;
    while i < 64 {
        let mut j = 0;
        while j < 64 {
            table[i * 64 + j] = [ALPHABET_BYTES[i], ALPHABET_BYTES[j]];
            j += 1;
        }
        i += 1;
    }
    table
};

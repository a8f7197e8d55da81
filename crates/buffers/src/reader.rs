//! Bounds-checked binary reader with cursor tracking.

use crate::BufferError;

/// A big-endian reader over a byte slice.
///
/// Every read is checked; running past the end yields
/// [`BufferError::EndOfBuffer`] and leaves the cursor untouched.
///
/// # Example
///
/// ```
/// use json_bind_buffers::Reader;
///
/// let data = [0x00, 0x00, 0x00, 0x02, b'h', b'i'];
/// let mut reader = Reader::new(&data);
/// let len = reader.u32().unwrap() as usize;
/// assert_eq!(reader.utf8(len).unwrap(), "hi");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Whether the cursor reached the end of input.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the next `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        if self.size() < size {
            return Err(BufferError::EndOfBuffer {
                at: self.x,
                needed: size,
            });
        }
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.array::<1>()?[0])
    }

    /// Reads a big-endian unsigned 16-bit integer.
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    /// Reads a big-endian unsigned 32-bit integer.
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    /// Reads a big-endian unsigned 64-bit integer.
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_be_bytes)
    }

    /// Reads a big-endian signed 64-bit integer.
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_be_bytes)
    }

    /// Reads a big-endian 64-bit float.
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Reads `size` bytes as a UTF-8 string.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let at = self.x;
        let bin = self.buf(size)?;
        std::str::from_utf8(bin).map_err(|_| {
            self.x = at;
            BufferError::InvalidUtf8 { at }
        })
    }
}

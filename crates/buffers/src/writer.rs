//! Growable output buffer.

/// An append-only byte buffer with a flush position.
///
/// # Example
///
/// ```
/// use json_bind_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(b'[');
/// writer.ascii("1,2");
/// writer.u8(b']');
/// assert_eq!(writer.flush(), b"[1,2]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that can hold `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
            x0: 0,
        }
    }

    /// Current cursor position.
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Ensures at least `capacity` more bytes can be written without growing.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.uint8.reserve(capacity);
    }

    /// Bytes written since the last flush.
    pub fn pending(&self) -> &[u8] {
        &self.uint8[self.x0..]
    }

    /// Returns the bytes written since the last flush and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..].to_vec();
        self.x0 = self.uint8.len();
        result
    }

    /// Consumes the writer and returns everything written since the last flush.
    pub fn into_vec(mut self) -> Vec<u8> {
        if self.x0 > 0 {
            self.uint8.drain(..self.x0);
        }
        self.uint8
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes a big-endian unsigned 16-bit integer.
    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a big-endian unsigned 32-bit integer.
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a big-endian unsigned 64-bit integer.
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a big-endian signed 64-bit integer.
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a big-endian 64-bit float.
    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }

    /// Writes an ASCII string.
    pub fn ascii(&mut self, s: &str) {
        self.utf8(s);
    }

    /// Writes `count` copies of `byte`.
    pub fn fill(&mut self, byte: u8, count: usize) {
        self.uint8.resize(self.uint8.len() + count, byte);
    }
}

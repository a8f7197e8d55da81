//! Protocol for values that travel as opaque bytes.

use json_bind_buffers::Writer;

/// A value with its own binary serialization.
///
/// The JSON writer serializes the value into a transient buffer and embeds it
/// as a base64 string; the reader decodes the string and hands the bytes to
/// [`BinaryValue::from_binary`].
///
/// # Example
///
/// ```
/// use json_bind::{BinaryValue, Reader, Writer};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Rgb(u8, u8, u8);
///
/// impl BinaryValue for Rgb {
///     fn write_binary(&self, out: &mut Writer) {
///         out.buf(&[self.0, self.1, self.2]);
///     }
///
///     fn from_binary(bytes: &[u8]) -> Option<Self> {
///         let mut reader = Reader::new(bytes);
///         let rgb = Rgb(reader.u8().ok()?, reader.u8().ok()?, reader.u8().ok()?);
///         reader.is_empty().then_some(rgb)
///     }
/// }
///
/// let mut out = Writer::new();
/// Rgb(1, 2, 3).write_binary(&mut out);
/// assert_eq!(Rgb::from_binary(&out.flush()), Some(Rgb(1, 2, 3)));
/// ```
pub trait BinaryValue: Sized {
    fn write_binary(&self, out: &mut Writer);

    /// Rebuilds a value, `None` when the bytes are not a valid encoding.
    fn from_binary(bytes: &[u8]) -> Option<Self>;
}

impl BinaryValue for Vec<u8> {
    fn write_binary(&self, out: &mut Writer) {
        out.buf(self);
    }

    fn from_binary(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

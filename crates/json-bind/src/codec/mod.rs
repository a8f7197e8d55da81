//! Codec entry points.
//!
//! - `context`: token adapter and per-read state
//! - `value`: value interpreter
//! - `walker`: array and object grammar
//! - `writer`: serializer
//!
//! Every entry point records at most one diagnostic: the error that ended the
//! call. Inner layers only return errors.

pub mod context;
mod value;
mod walker;
pub mod writer;

pub use context::{ParseContext, TokenKind};
pub use writer::JsonWriter;

use std::any::{Any, TypeId};
use std::io;

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::CodecError;
use crate::options::{ReadOptions, WriteOptions};
use crate::registry::TypeRegistry;
use value::{parse_value, Slot};

/// Reads and writes values through the descriptors of a registry.
///
/// # Example
///
/// ```
/// use json_bind::{Codec, ReadOptions, TypeBuilder, TypeRegistry, WriteOptions};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let mut registry = TypeRegistry::with_builtins();
/// registry
///     .register(
///         TypeBuilder::structure::<Point>("Point")
///             .member("x", "i32", |p| &p.x, |p| &mut p.x)
///             .member("y", "i32", |p| &p.y, |p| &mut p.y)
///             .build(),
///     )
///     .unwrap();
///
/// let codec = Codec::new(&registry);
/// let point: Point = codec
///     .read_as(r#"{"y": -2, "x": 1}"#, ReadOptions::default(), "Point")
///     .unwrap();
/// assert_eq!((point.x, point.y), (1, -2));
///
/// let text = codec
///     .write_to_text(&point, WriteOptions::default(), "Point")
///     .unwrap();
/// assert_eq!(text, r#"{"x":1,"y":-2}"#);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r TypeRegistry,
}

fn record(log: &mut Option<&mut Diagnostics>, err: &CodecError) {
    if let Some(log) = log {
        log.push(err.to_diagnostic());
    }
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Reads one value of `type_name` from `input`. Returns `None` on any
    /// failure; the reason goes to the diagnostics log when one is supplied.
    pub fn read<R: io::Read>(
        &self,
        mut input: R,
        mut options: ReadOptions<'_>,
        type_name: &str,
    ) -> Option<Box<dyn Any>> {
        let mut text = String::new();
        if let Err(err) = input.read_to_string(&mut text) {
            let err = CodecError::Io(err);
            debug!(type_name, error = %err, "read failed");
            record(&mut options.diagnostics, &err);
            return None;
        }
        self.read_from_text(&text, options, type_name)
    }

    pub fn read_from_text(
        &self,
        text: &str,
        options: ReadOptions<'_>,
        type_name: &str,
    ) -> Option<Box<dyn Any>> {
        self.try_read_from_text(text, options, type_name).ok()
    }

    /// Like [`read_from_text`](Self::read_from_text), returning the error.
    pub fn try_read_from_text(
        &self,
        text: &str,
        mut options: ReadOptions<'_>,
        type_name: &str,
    ) -> Result<Box<dyn Any>, CodecError> {
        debug!(type_name, len = text.len(), "read");
        let result = self.parse(text, &options, type_name);
        match &result {
            Ok(_) => debug!(type_name, "read done"),
            Err(err) => {
                match err {
                    CodecError::Parse(parse) => debug!(
                        type_name,
                        row = parse.row,
                        column = parse.column,
                        error = %parse.kind,
                        "read failed"
                    ),
                    other => debug!(type_name, error = %other, "read failed"),
                }
                record(&mut options.diagnostics, err);
            }
        }
        result
    }

    fn parse(
        &self,
        text: &str,
        options: &ReadOptions<'_>,
        type_name: &str,
    ) -> Result<Box<dyn Any>, CodecError> {
        let desc = self.registry.resolve(type_name)?;
        let mut ctx = ParseContext::new(text, self.registry, options.max_depth, options.skip_bom);
        let mut value = desc.create();
        parse_value(&mut ctx, desc, Slot::Inline(value.as_mut()))?;
        ctx.expect_end()?;
        Ok(value)
    }

    /// Reads a `T` directly. `T` must be the Rust type bound to `type_name`.
    pub fn read_as<T: 'static>(
        &self,
        text: &str,
        mut options: ReadOptions<'_>,
        type_name: &str,
    ) -> Option<T> {
        if let Ok(desc) = self.registry.resolve(type_name) {
            if desc.info().type_id != TypeId::of::<T>() {
                let err = CodecError::Binding(type_name.to_string());
                debug!(type_name, wanted = std::any::type_name::<T>(), "read failed");
                record(&mut options.diagnostics, &err);
                return None;
            }
        }
        let value = self.read_from_text(text, options, type_name)?;
        value.downcast::<T>().ok().map(|value| *value)
    }

    /// Writes `value` as JSON to `out`.
    pub fn write<W: io::Write>(
        &self,
        mut out: W,
        value: &dyn Any,
        mut options: WriteOptions<'_>,
        type_name: &str,
    ) -> Result<(), CodecError> {
        let result = self
            .serialize(value, &options, type_name)
            .and_then(|bytes| out.write_all(&bytes).map_err(CodecError::from));
        self.finish_write(&mut options, type_name, result)
    }

    pub fn write_to_text(
        &self,
        value: &dyn Any,
        mut options: WriteOptions<'_>,
        type_name: &str,
    ) -> Result<String, CodecError> {
        let result = self
            .serialize(value, &options, type_name)
            .and_then(|bytes| String::from_utf8(bytes).map_err(CodecError::from));
        self.finish_write(&mut options, type_name, result)
    }

    fn serialize(
        &self,
        value: &dyn Any,
        options: &WriteOptions<'_>,
        type_name: &str,
    ) -> Result<Vec<u8>, CodecError> {
        debug!(type_name, "write");
        let desc = self.registry.resolve(type_name)?;
        if !desc.is_instance(value) {
            return Err(CodecError::Binding(type_name.to_string()));
        }
        let mut writer = JsonWriter::new(self.registry)
            .real_precision(options.real_precision)
            .pretty(options.pretty);
        writer.write_value(desc, Some(value))?;
        Ok(writer.writer.into_vec())
    }

    fn finish_write<T>(
        &self,
        options: &mut WriteOptions<'_>,
        type_name: &str,
        result: Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        match &result {
            Ok(_) => debug!(type_name, "write done"),
            Err(err) => {
                debug!(type_name, error = %err, "write failed");
                record(&mut options.diagnostics, err);
            }
        }
        result
    }

    /// Releases a value produced by a read. The value is dropped in any
    /// case; an error reports that it was not an instance of `type_name`.
    pub fn destroy(&self, value: Box<dyn Any>, type_name: &str) -> Result<(), CodecError> {
        let desc = self.registry.resolve(type_name)?;
        if !desc.is_instance(&*value) {
            return Err(CodecError::Binding(type_name.to_string()));
        }
        drop(value);
        Ok(())
    }

    pub fn destroy_if_present(
        &self,
        value: Option<Box<dyn Any>>,
        type_name: &str,
    ) -> Result<(), CodecError> {
        match value {
            Some(value) => self.destroy(value, type_name),
            None => Ok(()),
        }
    }
}

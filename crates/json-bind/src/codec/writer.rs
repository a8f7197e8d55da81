//! `JsonWriter`: descriptor-driven JSON serializer.
//!
//! Output goes to a [`json_bind_buffers::Writer`]; the codec flushes it into
//! a string or an `io::Write` sink.

use std::any::Any;

use json_bind_buffers::Writer;

use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::type_def::{ElementStorage, TypeDescriptor};

pub struct JsonWriter<'r> {
    pub writer: Writer,
    registry: &'r TypeRegistry,
    real_precision: Option<usize>,
    pretty: bool,
    indent: usize,
}

impl<'r> JsonWriter<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            writer: Writer::new(),
            registry,
            real_precision: None,
            pretty: false,
            indent: 0,
        }
    }

    pub fn real_precision(mut self, decimals: Option<usize>) -> Self {
        self.real_precision = decimals;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Writes `value` as described by `desc`; `None` writes `null`.
    pub fn write_value(
        &mut self,
        desc: &TypeDescriptor,
        value: Option<&dyn Any>,
    ) -> Result<(), CodecError> {
        let Some(value) = value else {
            self.write_null();
            return Ok(());
        };
        let binding = || CodecError::Binding(desc.name().to_string());
        match desc {
            TypeDescriptor::Bool(t) => self.write_boolean((t.get)(value).ok_or_else(binding)?),
            TypeDescriptor::Int(t) => {
                let int = (t.get)(value).ok_or_else(binding)?;
                self.writer.ascii(&int.to_string());
            }
            TypeDescriptor::Real(t) => self.write_float((t.get)(value).ok_or_else(binding)?),
            TypeDescriptor::Str(t) => self.write_str((t.get)(value).ok_or_else(binding)?),
            TypeDescriptor::Enum(t) => {
                let number = (t.get)(value).ok_or_else(binding)?;
                let alias = t.alias_of(number).ok_or_else(binding)?;
                self.write_str(alias);
            }
            TypeDescriptor::Binary(t) => {
                let mut bytes = Writer::new();
                if !(t.write)(value, &mut bytes) {
                    return Err(binding());
                }
                let mut encoded = Vec::with_capacity(json_bind_base64::encoded_len(bytes.x()) + 2);
                encoded.push(b'"');
                json_bind_base64::encode_into(bytes.pending(), &mut encoded);
                encoded.push(b'"');
                self.writer.buf(&encoded);
            }
            TypeDescriptor::Struct(t) => {
                if t.members.is_empty() {
                    self.writer.ascii("{}");
                    return Ok(());
                }
                self.writer.u8(b'{');
                self.indent += 1;
                for (i, member) in t.members.values().enumerate() {
                    if i > 0 {
                        self.writer.u8(b',');
                    }
                    self.newline();
                    self.write_str(&member.name);
                    self.writer.u8(b':');
                    if self.pretty {
                        self.writer.u8(b' ');
                    }
                    let member_desc = self.resolve(&member.type_name)?;
                    let slot = (member.get)(value).ok_or_else(binding)?;
                    let slot = match &member.nullable {
                        Some(ops) => (ops.deref)(slot),
                        None => Some(slot),
                    };
                    self.write_value(member_desc, slot)?;
                }
                self.indent -= 1;
                self.newline();
                self.writer.u8(b'}');
            }
            TypeDescriptor::Container(t) => {
                let len = t.len(value).ok_or_else(binding)?;
                if len == 0 {
                    self.writer.ascii("[]");
                    return Ok(());
                }
                let element = self.resolve(&t.element)?;
                self.writer.u8(b'[');
                self.indent += 1;
                for i in 0..len {
                    if i > 0 {
                        self.writer.u8(b',');
                    }
                    self.newline();
                    let item = t.get(value, i).ok_or_else(binding)?;
                    let item = match &t.storage {
                        ElementStorage::Nullable(ops) => (ops.deref)(item),
                        _ => Some(item),
                    };
                    self.write_value(element, item)?;
                }
                self.indent -= 1;
                self.newline();
                self.writer.u8(b']');
            }
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<&'r TypeDescriptor, CodecError> {
        self.registry.resolve(name)
    }

    fn newline(&mut self) {
        if self.pretty {
            self.writer.u8(b'\n');
            self.writer.fill(b' ', self.indent * 2);
        }
    }

    pub fn write_null(&mut self) {
        self.writer.ascii("null");
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.ascii(if b { "true" } else { "false" });
    }

    /// Non-finite values have no JSON form and are written as `null`.
    pub fn write_float(&mut self, float: f64) {
        if !float.is_finite() {
            self.write_null();
        } else if let Some(decimals) = self.real_precision {
            self.writer.ascii(&format!("{:.*}", decimals, float));
        } else {
            self.writer.ascii(&format_float(float));
        }
    }

    /// Writes a quoted string with JSON escaping.
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.writer.ensure_capacity(bytes.len() + 2);
        self.writer.u8(b'"');
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let escaped: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                0x08 => b"\\b",
                0x0c => b"\\f",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x00..=0x1f => &[],
                _ => continue,
            };
            self.writer.buf(&bytes[start..i]);
            if escaped.is_empty() {
                self.writer.ascii(&format!("\\u{:04x}", b));
            } else {
                self.writer.buf(escaped);
            }
            start = i + 1;
        }
        self.writer.buf(&bytes[start..]);
        self.writer.u8(b'"');
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        // Shortest representation that reads back to the same value.
        format!("{}", f)
    }
}

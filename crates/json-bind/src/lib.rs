//! `json-bind`: reads and writes arbitrary Rust values as JSON, driven by
//! runtime type descriptors instead of compile-time derives.
//!
//! Types are described once with [`TypeBuilder`] and registered by name in a
//! [`TypeRegistry`]. A [`Codec`] then reads JSON text into freshly allocated
//! values of a named type and writes values back out.

pub mod codec;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod options;
pub mod registry;
pub mod type_def;

// Re-export the most commonly used types at crate root
pub use codec::{Codec, JsonWriter, TokenKind};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{CodecError, ParseError, ParseErrorKind};
pub use options::{ReadOptions, WriteOptions, DEFAULT_MAX_DEPTH};
pub use registry::TypeRegistry;
pub use type_def::{
    BinaryValue, ElementStorage, EnumBuilder, StructBuilder, TypeBuilder, TypeDescriptor,
};

pub use json_bind_base64 as base64;
pub use json_bind_buffers::{Reader, Writer};

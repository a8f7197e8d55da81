//! Runtime type descriptors.
//!
//! - `TypeDescriptor`: closed sum of the eight kinds the codec understands
//! - kind structs (`BoolType`, `StructType`, ...): the per-kind operation sets
//! - `TypeBuilder` / `StructBuilder` / `EnumBuilder`: derive descriptors for
//!   concrete Rust types

pub mod binary;
pub mod builder;
pub mod classes;

pub use binary::BinaryValue;
pub use builder::{EnumBuilder, IntValue, RealValue, StructBuilder, TypeBuilder};
pub use classes::*;

use std::any::Any;

/// The unified enum covering all descriptor kinds.
#[derive(Clone)]
pub enum TypeDescriptor {
    Bool(BoolType),
    Int(IntType),
    Real(RealType),
    Enum(EnumType),
    Str(StrType),
    Struct(StructType),
    Binary(BinaryType),
    Container(ContainerType),
}

impl TypeDescriptor {
    /// Returns the kind string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(t) => t.kind(),
            Self::Int(t) => t.kind(),
            Self::Real(t) => t.kind(),
            Self::Enum(t) => t.kind(),
            Self::Str(t) => t.kind(),
            Self::Struct(t) => t.kind(),
            Self::Binary(t) => t.kind(),
            Self::Container(t) => t.kind(),
        }
    }

    /// Returns a reference to the shared type info.
    pub fn info(&self) -> &TypeInfo {
        match self {
            Self::Bool(t) => &t.info,
            Self::Int(t) => &t.info,
            Self::Real(t) => &t.info,
            Self::Enum(t) => &t.info,
            Self::Str(t) => &t.info,
            Self::Struct(t) => &t.info,
            Self::Binary(t) => &t.info,
            Self::Container(t) => &t.info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Allocates a default instance of the described type.
    pub fn create(&self) -> Box<dyn Any> {
        (self.info().create)()
    }

    /// Whether `value` is an instance of the described Rust type.
    pub fn is_instance(&self, value: &dyn Any) -> bool {
        value.type_id() == self.info().type_id
    }

    /// Registry names this descriptor refers to (members, elements).
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::Struct(t) => t.members.values().map(|m| m.type_name.as_str()).collect(),
            Self::Container(t) => vec![t.element.as_str()],
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind(), self.name())
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}`", self.kind(), self.name())
    }
}

//! TypeRegistry: a namespace of named type descriptors.
//!
//! The registry is built up front and then shared read-only by any number of
//! codecs, possibly across threads.

use std::collections::HashMap;

use crate::error::CodecError;
use crate::type_def::{TypeBuilder, TypeDescriptor};

/// Named descriptors, resolved by exact name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the scalar types: `bool`, `i8`..`i64`,
    /// `u8`..`u64`, `f32`, `f64`, `string` and `bytes` (`Vec<u8>` as base64).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in [
            TypeBuilder::bool("bool"),
            TypeBuilder::int::<i8>("i8"),
            TypeBuilder::int::<i16>("i16"),
            TypeBuilder::int::<i32>("i32"),
            TypeBuilder::int::<i64>("i64"),
            TypeBuilder::int::<u8>("u8"),
            TypeBuilder::int::<u16>("u16"),
            TypeBuilder::int::<u32>("u32"),
            TypeBuilder::int::<u64>("u64"),
            TypeBuilder::real::<f32>("f32"),
            TypeBuilder::real::<f64>("f64"),
            TypeBuilder::string("string"),
            TypeBuilder::binary::<Vec<u8>>("bytes"),
        ] {
            registry
                .types
                .insert(descriptor.name().to_string(), descriptor);
        }
        registry
    }

    /// Adds a descriptor under its own name. Names are unique.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), CodecError> {
        let name = descriptor.name().to_string();
        if self.types.contains_key(&name) {
            return Err(CodecError::DuplicateType(name));
        }
        self.types.insert(name, descriptor);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self, CodecError> {
        self.register(descriptor)?;
        Ok(self)
    }

    pub fn resolve(&self, name: &str) -> Result<&TypeDescriptor, CodecError> {
        self.types
            .get(name)
            .ok_or_else(|| CodecError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Element descriptor of the container registered as `type_name`.
    pub fn container_element_type(&self, type_name: &str) -> Result<&TypeDescriptor, CodecError> {
        match self.resolve(type_name)? {
            TypeDescriptor::Container(container) => self.resolve(&container.element),
            _ => Err(CodecError::NotAContainer(type_name.to_string())),
        }
    }

    /// Verifies that every member and element type name resolves.
    pub fn check(&self) -> Result<(), CodecError> {
        let mut names: Vec<&String> = self.types.keys().collect();
        names.sort();
        for name in names {
            for missing in self.types[name].references() {
                if !self.contains(missing) {
                    return Err(CodecError::DanglingReference {
                        name: name.clone(),
                        missing: missing.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

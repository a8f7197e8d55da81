//! Kind structs carried by [`TypeDescriptor`](super::TypeDescriptor).
//!
//! Every operation is type-erased over `&dyn Any` / `&mut dyn Any` and
//! reports a storage mismatch by returning `false` or `None` instead of
//! panicking. The codec never downcasts values itself.

use std::any::{Any, TypeId};
use std::sync::Arc;

use indexmap::IndexMap;
use json_bind_buffers::Writer;

pub type CreateFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
pub type SetFn<V> = Arc<dyn Fn(&mut dyn Any, V) -> bool + Send + Sync>;
pub type GetFn<V> = Arc<dyn Fn(&dyn Any) -> Option<V> + Send + Sync>;
pub type SetStrFn = Arc<dyn Fn(&mut dyn Any, &str) -> bool + Send + Sync>;
pub type GetStrFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a str> + Send + Sync>;
pub type ProjectFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
pub type ProjectMutFn =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;
pub type IndexFn = Arc<dyn for<'a> Fn(&'a dyn Any, usize) -> Option<&'a dyn Any> + Send + Sync>;
pub type IndexMutFn =
    Arc<dyn for<'a> Fn(&'a mut dyn Any, usize) -> Option<&'a mut dyn Any> + Send + Sync>;
pub type StoreFn = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;
pub type ClearFn = Arc<dyn Fn(&mut dyn Any) -> bool + Send + Sync>;
pub type LenFn = Arc<dyn Fn(&dyn Any) -> Option<usize> + Send + Sync>;
pub type ConstructFn = Arc<dyn Fn(&mut dyn Any, &[u8]) -> bool + Send + Sync>;
pub type WriteBinaryFn = Arc<dyn Fn(&dyn Any, &mut Writer) -> bool + Send + Sync>;

// Helpers that pin closures to their higher-ranked signatures.

pub(crate) fn project<F>(f: F) -> ProjectFn
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn project_mut<F>(f: F) -> ProjectMutFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn index<F>(f: F) -> IndexFn
where
    F: for<'a> Fn(&'a dyn Any, usize) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn index_mut<F>(f: F) -> IndexMutFn
where
    F: for<'a> Fn(&'a mut dyn Any, usize) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn get_str<F>(f: F) -> GetStrFn
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a str> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -------------------------------------------------------------------------
// TypeInfo

/// Fields shared by every descriptor.
#[derive(Clone)]
pub struct TypeInfo {
    /// Registry name.
    pub name: String,
    /// Rust type of an instance, as produced by `create`.
    pub type_id: TypeId,
    pub rust_name: &'static str,
    pub create: CreateFn,
}

impl TypeInfo {
    pub fn of<T: Default + Send + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            create: Arc::new(|| Box::new(T::default()) as Box<dyn Any>),
        }
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("rust_name", &self.rust_name)
            .finish()
    }
}

// -------------------------------------------------------------------------
// Scalars

#[derive(Clone)]
pub struct BoolType {
    pub info: TypeInfo,
    pub(crate) set: SetFn<bool>,
    pub(crate) get: GetFn<bool>,
}

impl BoolType {
    pub fn kind(&self) -> &'static str {
        "bool"
    }
}

/// Integer descriptor; `min..=max` is the range of the backing Rust type.
#[derive(Clone)]
pub struct IntType {
    pub info: TypeInfo,
    pub min: i128,
    pub max: i128,
    pub(crate) set: SetFn<i128>,
    pub(crate) get: GetFn<i128>,
}

impl IntType {
    pub fn kind(&self) -> &'static str {
        "int"
    }
}

#[derive(Clone)]
pub struct RealType {
    pub info: TypeInfo,
    pub(crate) set: SetFn<f64>,
    pub(crate) get: GetFn<f64>,
}

impl RealType {
    pub fn kind(&self) -> &'static str {
        "real"
    }
}

#[derive(Clone)]
pub struct StrType {
    pub info: TypeInfo,
    pub(crate) set: SetStrFn,
    pub(crate) get: GetStrFn,
}

impl StrType {
    pub fn kind(&self) -> &'static str {
        "string"
    }
}

// -------------------------------------------------------------------------
// EnumType

/// Enumeration with symbolic aliases. Written as the alias string; read
/// from either the alias or its numeric value.
#[derive(Clone)]
pub struct EnumType {
    pub info: TypeInfo,
    /// `(alias, value)` in declaration order.
    pub aliases: Vec<(String, i64)>,
    pub(crate) set: SetFn<i64>,
    pub(crate) get: GetFn<i64>,
}

impl EnumType {
    pub fn kind(&self) -> &'static str {
        "enum"
    }

    pub fn value_of(&self, alias: &str) -> Option<i64> {
        self.aliases
            .iter()
            .find(|(name, _)| name == alias)
            .map(|(_, value)| *value)
    }

    pub fn alias_of(&self, value: i64) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }
}

// -------------------------------------------------------------------------
// BinaryType

/// Opaque value carried as a base64 string.
#[derive(Clone)]
pub struct BinaryType {
    pub info: TypeInfo,
    pub(crate) construct: ConstructFn,
    pub(crate) write: WriteBinaryFn,
}

impl BinaryType {
    pub fn kind(&self) -> &'static str {
        "binary"
    }
}

// -------------------------------------------------------------------------
// Slots

/// Operations on an `Option<T>` or `Option<Box<T>>` slot.
///
/// A value is installed only once it has been fully built elsewhere, so a
/// failed read never leaves a half-initialized value behind.
#[derive(Clone)]
pub struct NullableOps {
    /// `Some(&T)` when present.
    pub(crate) deref: ProjectFn,
    /// Sets the slot to `None`.
    pub(crate) clear: ClearFn,
    /// Installs a boxed `T` produced by the descriptor's `create`.
    pub(crate) store: StoreFn,
}

/// Named struct member.
#[derive(Clone)]
pub struct Member {
    pub name: String,
    /// Registry name of the member's descriptor.
    pub type_name: String,
    pub(crate) get: ProjectFn,
    pub(crate) get_mut: ProjectMutFn,
    /// Present when the member accepts `null`.
    pub(crate) nullable: Option<NullableOps>,
}

impl Member {
    pub fn is_nullable(&self) -> bool {
        self.nullable.is_some()
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("nullable", &self.is_nullable())
            .finish()
    }
}

// -------------------------------------------------------------------------
// StructType

#[derive(Clone)]
pub struct StructType {
    pub info: TypeInfo,
    /// Members in write order, looked up by exact name on read.
    pub members: IndexMap<String, Member>,
}

impl StructType {
    pub fn kind(&self) -> &'static str {
        "struct"
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }
}

// -------------------------------------------------------------------------
// ContainerType

/// How a container keeps its elements.
#[derive(Clone)]
pub enum ElementStorage {
    /// `Vec<T>`: elements are embedded.
    Value,
    /// `Vec<Box<T>>`: elements are held through a pointer.
    Reference,
    /// `Vec<Option<T>>` or `Vec<Option<Box<T>>>`: elements that may be `null`.
    Nullable(NullableOps),
}

#[derive(Clone)]
pub struct ContainerType {
    pub info: TypeInfo,
    /// Registry name of the element descriptor.
    pub element: String,
    pub storage: ElementStorage,
    pub(crate) len: LenFn,
    /// Element by index. Reference storage follows the pointer; nullable
    /// storage yields the `Option<T>` slot itself.
    pub(crate) get: IndexFn,
    pub(crate) get_mut: IndexMutFn,
    /// Appends a default element (value and nullable storage).
    pub(crate) append: ProjectMutFn,
    /// Appends a boxed element built elsewhere (reference storage).
    pub(crate) push_boxed: StoreFn,
    pub(crate) remove_last: ClearFn,
}

impl ContainerType {
    pub fn kind(&self) -> &'static str {
        "container"
    }

    pub fn by_reference(&self) -> bool {
        matches!(self.storage, ElementStorage::Reference)
    }

    /// Number of elements, `None` on a storage mismatch.
    pub fn len(&self, container: &dyn Any) -> Option<usize> {
        (self.len)(container)
    }

    pub fn get<'a>(&self, container: &'a dyn Any, i: usize) -> Option<&'a dyn Any> {
        (self.get)(container, i)
    }

    pub fn get_mut<'a>(&self, container: &'a mut dyn Any, i: usize) -> Option<&'a mut dyn Any> {
        (self.get_mut)(container, i)
    }
}

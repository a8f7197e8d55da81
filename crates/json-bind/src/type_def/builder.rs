//! Descriptor factories for concrete Rust types.
//!
//! The builders generate the type-erased operation sets from ordinary Rust
//! types and field projections, so a binding is declared once and never
//! touches `Any` directly.
//!
//! # Example
//!
//! ```
//! use json_bind::{TypeBuilder, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     label: Option<String>,
//! }
//!
//! let point: TypeDescriptor = TypeBuilder::structure::<Point>("Point")
//!     .member("x", "i32", |p| &p.x, |p| &mut p.x)
//!     .nullable_member("label", "string", |p| &p.label, |p| &mut p.label)
//!     .build();
//! assert_eq!(point.kind(), "struct");
//! assert_eq!(point.references(), ["i32", "string"]);
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;

use super::binary::BinaryValue;
use super::classes::*;
use super::TypeDescriptor;

/// Integer types usable as `int` storage. Values travel through `i128`,
/// which holds every `i64` and `u64` exactly.
pub trait IntValue: Copy + Default + Send + Sync + 'static {
    const MIN: i128;
    const MAX: i128;
    fn to_i128(self) -> i128;
    fn from_i128(v: i128) -> Option<Self>;
}

macro_rules! int_value {
    ($($t:ty),*) => {$(
        impl IntValue for $t {
            const MIN: i128 = <$t>::MIN as i128;
            const MAX: i128 = <$t>::MAX as i128;
            fn to_i128(self) -> i128 {
                self as i128
            }
            fn from_i128(v: i128) -> Option<Self> {
                <$t>::try_from(v).ok()
            }
        }
    )*};
}

int_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Floating-point types usable as `real` storage.
pub trait RealValue: Copy + Default + Send + Sync + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl RealValue for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl RealValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

fn assign<T: 'static>(slot: &mut dyn Any, value: T) -> bool {
    match slot.downcast_mut::<T>() {
        Some(target) => {
            *target = value;
            true
        }
        None => false,
    }
}

fn option_ops<U: 'static>() -> NullableOps {
    NullableOps {
        deref: project(|any| {
            any.downcast_ref::<Option<U>>()?
                .as_ref()
                .map(|u| u as &dyn Any)
        }),
        clear: Arc::new(|any: &mut dyn Any| assign::<Option<U>>(any, None)),
        store: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
            match (any.downcast_mut::<Option<U>>(), value.downcast::<U>()) {
                (Some(slot), Ok(value)) => {
                    *slot = Some(*value);
                    true
                }
                _ => false,
            }
        }),
    }
}

fn boxed_option_ops<U: 'static>() -> NullableOps {
    NullableOps {
        deref: project(|any| {
            any.downcast_ref::<Option<Box<U>>>()?
                .as_deref()
                .map(|u| u as &dyn Any)
        }),
        clear: Arc::new(|any: &mut dyn Any| assign::<Option<Box<U>>>(any, None)),
        store: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
            match (any.downcast_mut::<Option<Box<U>>>(), value.downcast::<U>()) {
                (Some(slot), Ok(value)) => {
                    *slot = Some(value);
                    true
                }
                _ => false,
            }
        }),
    }
}

/// Factory for descriptors of the eight kinds.
pub struct TypeBuilder;

impl TypeBuilder {
    pub fn bool(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::Bool(BoolType {
            info: TypeInfo::of::<bool>(name),
            set: Arc::new(|slot: &mut dyn Any, v: bool| assign(slot, v)),
            get: Arc::new(|slot: &dyn Any| slot.downcast_ref::<bool>().copied()),
        })
    }

    pub fn int<T: IntValue>(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::Int(IntType {
            info: TypeInfo::of::<T>(name),
            min: T::MIN,
            max: T::MAX,
            set: Arc::new(|slot: &mut dyn Any, v: i128| {
                T::from_i128(v).is_some_and(|v| assign(slot, v))
            }),
            get: Arc::new(|slot: &dyn Any| slot.downcast_ref::<T>().map(|v| v.to_i128())),
        })
    }

    pub fn real<T: RealValue>(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::Real(RealType {
            info: TypeInfo::of::<T>(name),
            set: Arc::new(|slot: &mut dyn Any, v: f64| assign(slot, T::from_f64(v))),
            get: Arc::new(|slot: &dyn Any| slot.downcast_ref::<T>().map(|v| v.to_f64())),
        })
    }

    pub fn string(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::Str(StrType {
            info: TypeInfo::of::<String>(name),
            set: Arc::new(|slot: &mut dyn Any, s: &str| match slot.downcast_mut::<String>() {
                Some(target) => {
                    target.clear();
                    target.push_str(s);
                    true
                }
                None => false,
            }),
            get: get_str(|slot| slot.downcast_ref::<String>().map(String::as_str)),
        })
    }

    pub fn binary<T>(name: impl Into<String>) -> TypeDescriptor
    where
        T: BinaryValue + Default + Send + 'static,
    {
        TypeDescriptor::Binary(BinaryType {
            info: TypeInfo::of::<T>(name),
            construct: Arc::new(|slot: &mut dyn Any, bytes: &[u8]| {
                T::from_binary(bytes).is_some_and(|v| assign(slot, v))
            }),
            write: Arc::new(
                |slot: &dyn Any, out: &mut json_bind_buffers::Writer| match slot
                    .downcast_ref::<T>()
                {
                    Some(value) => {
                        value.write_binary(out);
                        true
                    }
                    None => false,
                },
            ),
        })
    }

    pub fn enumeration<E>(name: impl Into<String>) -> EnumBuilder<E>
    where
        E: Copy + PartialEq + Default + Send + Sync + 'static,
    {
        EnumBuilder {
            info: TypeInfo::of::<E>(name),
            variants: Vec::new(),
        }
    }

    pub fn structure<T: Default + Send + 'static>(name: impl Into<String>) -> StructBuilder<T> {
        StructBuilder {
            info: TypeInfo::of::<T>(name),
            members: IndexMap::new(),
            _marker: PhantomData,
        }
    }

    /// `Vec<U>`: value-stored elements.
    pub fn container<U: Default + Send + 'static>(
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> TypeDescriptor {
        TypeDescriptor::Container(ContainerType {
            info: TypeInfo::of::<Vec<U>>(name),
            element: element.into(),
            storage: ElementStorage::Value,
            len: Arc::new(|any: &dyn Any| any.downcast_ref::<Vec<U>>().map(Vec::len)),
            get: index(|any, i| any.downcast_ref::<Vec<U>>()?.get(i).map(|u| u as &dyn Any)),
            get_mut: index_mut(|any, i| {
                any.downcast_mut::<Vec<U>>()?
                    .get_mut(i)
                    .map(|u| u as &mut dyn Any)
            }),
            append: project_mut(|any| {
                let items = any.downcast_mut::<Vec<U>>()?;
                items.push(U::default());
                items.last_mut().map(|u| u as &mut dyn Any)
            }),
            push_boxed: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
                match (any.downcast_mut::<Vec<U>>(), value.downcast::<U>()) {
                    (Some(items), Ok(value)) => {
                        items.push(*value);
                        true
                    }
                    _ => false,
                }
            }),
            remove_last: Arc::new(|any: &mut dyn Any| {
                any.downcast_mut::<Vec<U>>()
                    .is_some_and(|items| items.pop().is_some())
            }),
        })
    }

    /// `Vec<Box<U>>`: reference-stored elements.
    pub fn boxed_container<U: Default + Send + 'static>(
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> TypeDescriptor {
        TypeDescriptor::Container(ContainerType {
            info: TypeInfo::of::<Vec<Box<U>>>(name),
            element: element.into(),
            storage: ElementStorage::Reference,
            len: Arc::new(|any: &dyn Any| any.downcast_ref::<Vec<Box<U>>>().map(Vec::len)),
            get: index(|any, i| {
                any.downcast_ref::<Vec<Box<U>>>()?
                    .get(i)
                    .map(|u| u.as_ref() as &dyn Any)
            }),
            get_mut: index_mut(|any, i| {
                any.downcast_mut::<Vec<Box<U>>>()?
                    .get_mut(i)
                    .map(|u| u.as_mut() as &mut dyn Any)
            }),
            append: project_mut(|any| {
                let items = any.downcast_mut::<Vec<Box<U>>>()?;
                items.push(Box::default());
                items.last_mut().map(|u| u.as_mut() as &mut dyn Any)
            }),
            push_boxed: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
                match (any.downcast_mut::<Vec<Box<U>>>(), value.downcast::<U>()) {
                    (Some(items), Ok(value)) => {
                        items.push(value);
                        true
                    }
                    _ => false,
                }
            }),
            remove_last: Arc::new(|any: &mut dyn Any| {
                any.downcast_mut::<Vec<Box<U>>>()
                    .is_some_and(|items| items.pop().is_some())
            }),
        })
    }

    /// `Vec<Option<U>>`: value-stored elements that may be `null`.
    pub fn nullable_container<U: Send + 'static>(
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> TypeDescriptor {
        TypeDescriptor::Container(ContainerType {
            info: TypeInfo::of::<Vec<Option<U>>>(name),
            element: element.into(),
            storage: ElementStorage::Nullable(option_ops::<U>()),
            len: Arc::new(|any: &dyn Any| any.downcast_ref::<Vec<Option<U>>>().map(Vec::len)),
            get: index(|any, i| {
                any.downcast_ref::<Vec<Option<U>>>()?
                    .get(i)
                    .map(|u| u as &dyn Any)
            }),
            get_mut: index_mut(|any, i| {
                any.downcast_mut::<Vec<Option<U>>>()?
                    .get_mut(i)
                    .map(|u| u as &mut dyn Any)
            }),
            append: project_mut(|any| {
                let items = any.downcast_mut::<Vec<Option<U>>>()?;
                items.push(None);
                items.last_mut().map(|u| u as &mut dyn Any)
            }),
            push_boxed: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
                match (any.downcast_mut::<Vec<Option<U>>>(), value.downcast::<U>()) {
                    (Some(items), Ok(value)) => {
                        items.push(Some(*value));
                        true
                    }
                    _ => false,
                }
            }),
            remove_last: Arc::new(|any: &mut dyn Any| {
                any.downcast_mut::<Vec<Option<U>>>()
                    .is_some_and(|items| items.pop().is_some())
            }),
        })
    }

    /// `Vec<Option<Box<U>>>`: reference-stored elements that may be `null`.
    pub fn nullable_boxed_container<U: Send + 'static>(
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> TypeDescriptor {
        TypeDescriptor::Container(ContainerType {
            info: TypeInfo::of::<Vec<Option<Box<U>>>>(name),
            element: element.into(),
            storage: ElementStorage::Nullable(boxed_option_ops::<U>()),
            len: Arc::new(|any: &dyn Any| any.downcast_ref::<Vec<Option<Box<U>>>>().map(Vec::len)),
            get: index(|any, i| {
                any.downcast_ref::<Vec<Option<Box<U>>>>()?
                    .get(i)
                    .map(|u| u as &dyn Any)
            }),
            get_mut: index_mut(|any, i| {
                any.downcast_mut::<Vec<Option<Box<U>>>>()?
                    .get_mut(i)
                    .map(|u| u as &mut dyn Any)
            }),
            append: project_mut(|any| {
                let items = any.downcast_mut::<Vec<Option<Box<U>>>>()?;
                items.push(None);
                items.last_mut().map(|u| u as &mut dyn Any)
            }),
            push_boxed: Arc::new(|any: &mut dyn Any, value: Box<dyn Any>| {
                match (any.downcast_mut::<Vec<Option<Box<U>>>>(), value.downcast::<U>()) {
                    (Some(items), Ok(value)) => {
                        items.push(Some(value));
                        true
                    }
                    _ => false,
                }
            }),
            remove_last: Arc::new(|any: &mut dyn Any| {
                any.downcast_mut::<Vec<Option<Box<U>>>>()
                    .is_some_and(|items| items.pop().is_some())
            }),
        })
    }
}

// -------------------------------------------------------------------------
// EnumBuilder

/// Collects `(alias, value, variant)` triples for an enum descriptor.
pub struct EnumBuilder<E> {
    info: TypeInfo,
    variants: Vec<(String, i64, E)>,
}

impl<E> EnumBuilder<E>
where
    E: Copy + PartialEq + Default + Send + Sync + 'static,
{
    pub fn variant(mut self, alias: impl Into<String>, value: i64, variant: E) -> Self {
        self.variants.push((alias.into(), value, variant));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let table: Arc<Vec<(i64, E)>> =
            Arc::new(self.variants.iter().map(|(_, n, e)| (*n, *e)).collect());
        let lookup = table.clone();
        TypeDescriptor::Enum(EnumType {
            info: self.info,
            aliases: self
                .variants
                .into_iter()
                .map(|(alias, n, _)| (alias, n))
                .collect(),
            set: Arc::new(move |slot: &mut dyn Any, v: i64| {
                table
                    .iter()
                    .find(|(n, _)| *n == v)
                    .is_some_and(|(_, e)| assign(slot, *e))
            }),
            get: Arc::new(move |slot: &dyn Any| {
                let current = slot.downcast_ref::<E>()?;
                lookup
                    .iter()
                    .find(|(_, e)| e == current)
                    .map(|(n, _)| *n)
            }),
        })
    }
}

// -------------------------------------------------------------------------
// StructBuilder

/// Declares the members of a struct descriptor in write order.
pub struct StructBuilder<T> {
    info: TypeInfo,
    members: IndexMap<String, Member>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Default + Send + 'static> StructBuilder<T> {
    fn push(
        mut self,
        name: String,
        type_name: String,
        get: ProjectFn,
        get_mut: ProjectMutFn,
        nullable: Option<NullableOps>,
    ) -> Self {
        let member = Member {
            name: name.clone(),
            type_name,
            get,
            get_mut,
            nullable,
        };
        self.members.insert(name, member);
        self
    }

    /// Inline member of type `U`; never `null`.
    pub fn member<U: 'static>(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        get: fn(&T) -> &U,
        get_mut: fn(&mut T) -> &mut U,
    ) -> Self {
        self.push(
            name.into(),
            type_name.into(),
            project(move |any| any.downcast_ref::<T>().map(|t| get(t) as &dyn Any)),
            project_mut(move |any| any.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn Any)),
            None,
        )
    }

    /// `Option<U>` member; `null` and absence map to `None`.
    pub fn nullable_member<U: 'static>(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        get: fn(&T) -> &Option<U>,
        get_mut: fn(&mut T) -> &mut Option<U>,
    ) -> Self {
        self.push(
            name.into(),
            type_name.into(),
            project(move |any| any.downcast_ref::<T>().map(|t| get(t) as &dyn Any)),
            project_mut(move |any| any.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn Any)),
            Some(option_ops::<U>()),
        )
    }

    /// `Option<Box<U>>` member: a nullable pointer, allocated only when the
    /// JSON value is not `null`.
    pub fn boxed_member<U: 'static>(
        self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        get: fn(&T) -> &Option<Box<U>>,
        get_mut: fn(&mut T) -> &mut Option<Box<U>>,
    ) -> Self {
        self.push(
            name.into(),
            type_name.into(),
            project(move |any| any.downcast_ref::<T>().map(|t| get(t) as &dyn Any)),
            project_mut(move |any| any.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn Any)),
            Some(boxed_option_ops::<U>()),
        )
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Struct(StructType {
            info: self.info,
            members: self.members,
        })
    }
}

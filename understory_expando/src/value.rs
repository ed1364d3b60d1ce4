// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property values.
//!
//! This module provides [`Value`] for storing property values of any type in
//! a heterogeneous container, and [`TypeTag`] for describing a value's
//! runtime type.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::callable::Callable;

/// A runtime identifier for the type of a stored value.
///
/// Two tags are equal when they describe the same Rust type. The name is
/// carried along for display and inspector tooling.
///
/// # Example
///
/// ```rust
/// use understory_expando::TypeTag;
///
/// let tag = TypeTag::of::<i32>();
/// assert!(tag.is::<i32>());
/// assert_eq!(tag.name(), "i32");
/// ```
#[derive(Copy, Clone)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Returns the tag for type `T`.
    #[must_use]
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the tagged type.
    #[must_use]
    #[inline]
    pub fn id(self) -> TypeId {
        self.id
    }

    /// Returns the Rust type name of the tagged type.
    #[must_use]
    #[inline]
    pub fn name(self) -> &'static str {
        self.name
    }

    /// Returns `true` if this tag describes type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: ?Sized + 'static>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeTag").field(&self.name).finish()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased property value.
///
/// This wraps a value of any `'static + Clone + PartialEq` type, storing it
/// on the heap with its [`TypeTag`] for later downcasting. Equality between
/// two values uses the stored type's own `PartialEq` and is `false` whenever
/// the types differ.
///
/// # Example
///
/// ```rust
/// use understory_expando::Value;
///
/// let value = Value::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
///
/// let text = Value::from("hello");
/// assert_eq!(text.downcast_ref::<String>().map(String::as_str), Some("hello"));
/// assert_ne!(value, text);
/// ```
pub struct Value {
    inner: Box<dyn ErasedValue>,
    type_tag: TypeTag,
}

impl Value {
    /// Creates a new value from a concrete value.
    #[must_use]
    pub fn new<T: Clone + PartialEq + 'static>(value: T) -> Self {
        Self {
            type_tag: TypeTag::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the unit value, used as the result of callables with nothing
    /// to return.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Returns the [`TypeTag`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_tag.is::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Returns `true` if the contained value is a [`Callable`].
    #[must_use]
    #[inline]
    pub fn is_callable(&self) -> bool {
        self.is::<Callable>()
    }

    /// Returns the contained [`Callable`], if any.
    #[must_use]
    pub fn as_callable(&self) -> Option<&Callable> {
        self.downcast_ref()
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
            type_tag: self.type_tag,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag == other.type_tag && self.inner.eq_erased(other.inner.as_any())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_tag.name)
            .finish_non_exhaustive()
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_from_for_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    Callable,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(String::from(value))
    }
}

/// Trait object for type-erased values that can be cloned and compared.
trait ErasedValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ErasedValue>;
    fn eq_erased(&self, other: &dyn Any) -> bool;
}

impl<T: Clone + PartialEq + 'static> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ErasedValue> {
        Box::new(self.clone())
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

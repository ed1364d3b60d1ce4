// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata projection.
//!
//! This module provides [`Descriptor`], the inspector-facing description of
//! one stored property, and [`DescriptorSet`], the ordered collection of
//! descriptors that a [`PropertyStore`](crate::PropertyStore) keeps in
//! lockstep with its entries.

use alloc::string::String;
use bitflags::bitflags;
use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::expando::Expando;
use crate::value::{TypeTag, Value};

bitflags! {
    /// Capability flags reported for a property.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct DescriptorFlags: u8 {
        /// The property rejects writes.
        const READ_ONLY = 1 << 0;
        /// The property can be reset to a default value.
        const CAN_RESET = 1 << 1;
        /// The property's value should be persisted by serializers.
        const SHOULD_SERIALIZE = 1 << 2;
    }
}

impl DescriptorFlags {
    /// Flags carried by every dynamically added property: writable, not
    /// resettable, serializable.
    pub const DYNAMIC: Self = Self::SHOULD_SERIALIZE;
}

/// Metadata describing one stored property.
///
/// The declared type tracks the type of the value currently stored under
/// [`name`](Self::name); it is refreshed every time the value is replaced.
///
/// # Example
///
/// ```rust
/// use understory_expando::{Expando, TypeTag};
///
/// let expando = Expando::new();
/// expando.set("Width", 10.0_f64);
///
/// let descriptor = expando.describe("Width").unwrap();
/// assert_eq!(descriptor.name(), "Width");
/// assert_eq!(descriptor.declared_type(), TypeTag::of::<f64>());
/// assert!(!descriptor.is_read_only());
/// assert!(descriptor.should_serialize_value());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    declared_type: TypeTag,
    flags: DescriptorFlags,
}

impl Descriptor {
    pub(crate) fn new(name: String, declared_type: TypeTag) -> Self {
        Self {
            name,
            declared_type,
            flags: DescriptorFlags::DYNAMIC,
        }
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the property's current value.
    #[must_use]
    #[inline]
    pub fn declared_type(&self) -> TypeTag {
        self.declared_type
    }

    /// Returns the capability flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> DescriptorFlags {
        self.flags
    }

    /// Returns `true` if the property rejects writes. Always `false` for
    /// dynamic properties.
    #[must_use]
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(DescriptorFlags::READ_ONLY)
    }

    /// Returns `true` if the property can be reset. Always `false` for
    /// dynamic properties.
    #[must_use]
    #[inline]
    pub fn can_reset_value(&self) -> bool {
        self.flags.contains(DescriptorFlags::CAN_RESET)
    }

    /// Returns `true` if serializers should persist the property. Always
    /// `true` for dynamic properties.
    #[must_use]
    #[inline]
    pub fn should_serialize_value(&self) -> bool {
        self.flags.contains(DescriptorFlags::SHOULD_SERIALIZE)
    }

    /// Reads this property from `component`.
    ///
    /// Returns `None` if the component has no property by this name.
    #[must_use]
    pub fn get_value(&self, component: &Expando) -> Option<Value> {
        component.get(&self.name)
    }

    /// Writes this property on `component`, creating it if needed.
    ///
    /// This goes through the component's store, so subscribers are notified
    /// as for any other write.
    pub fn set_value(&self, component: &Expando, value: impl Into<Value>) {
        component.set(&self.name, value);
    }

    pub(crate) fn refresh_type(&mut self, declared_type: TypeTag) {
        self.declared_type = declared_type;
    }
}

/// The ordered set of descriptors for a store.
///
/// Keys and order always match the owning store's entries; only the store
/// mutates it.
#[derive(Clone, Debug, Default)]
pub struct DescriptorSet {
    by_name: IndexMap<String, Descriptor, DefaultHashBuilder>,
}

impl DescriptorSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            by_name: IndexMap::with_capacity_and_hasher(capacity, DefaultHashBuilder::default()),
        }
    }

    /// Returns the number of descriptors.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if there are no descriptors.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Looks up the descriptor for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.by_name.get(name)
    }

    /// Returns an iterator over descriptors in property order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.by_name.values()
    }

    /// Returns an iterator over described property names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: &str, declared_type: TypeTag) {
        let previous = self.by_name.insert(
            String::from(name),
            Descriptor::new(String::from(name), declared_type),
        );
        debug_assert!(
            previous.is_none(),
            "descriptor for `{name}` already present"
        );
    }

    pub(crate) fn refresh(&mut self, name: &str, declared_type: TypeTag) {
        let descriptor = self.by_name.get_mut(name);
        debug_assert!(descriptor.is_some(), "no descriptor for `{name}`");
        if let Some(descriptor) = descriptor {
            descriptor.refresh_type(declared_type);
        }
    }

    pub(crate) fn remove(&mut self, name: &str) {
        let removed = self.by_name.shift_remove(name);
        debug_assert!(removed.is_some(), "no descriptor for `{name}`");
    }

    pub(crate) fn clear(&mut self) {
        self.by_name.clear();
    }
}

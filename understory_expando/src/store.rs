// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered name→value property storage.
//!
//! This module provides [`PropertyStore`], the authoritative mapping behind an
//! [`Expando`](crate::Expando).
//!
//! # Implementation
//!
//! Entries live in an insertion-ordered hash map. Lookup, insertion and
//! update are O(1). Removal is O(n) in the number of later entries: it
//! shifts them down so iteration order stays the order in which names were
//! first added.
//!
//! The mutating methods that hand back what they displaced
//! ([`insert`](PropertyStore::insert),
//! [`remove_entry`](PropertyStore::remove_entry),
//! [`drain`](PropertyStore::drain)) let a caller holding the store behind a
//! `RefCell` release its borrow before the old values are dropped.
//!
//! The store owns the [`DescriptorSet`] describing its entries and updates it
//! inside every mutating call, so the two can never be observed out of step.
//! Change notification is *not* raised here: the store has no notion of
//! subscribers, and callers fan out events after the mutation returns.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::metadata::DescriptorSet;
use crate::value::{TypeTag, Value};

/// A stored property: name, value, and the value's type at assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyEntry {
    name: String,
    value: Value,
    value_type: TypeTag,
}

impl PropertyEntry {
    fn new(name: String, value: Value) -> Self {
        Self {
            value_type: value.type_tag(),
            name,
            value,
        }
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored value.
    #[must_use]
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the type of the stored value.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> TypeTag {
        self.value_type
    }
}

/// What [`PropertyStore::set`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The name was new; an entry and its descriptor were created.
    Added,
    /// The name existed; its value and declared type were replaced.
    Updated,
}

/// Authoritative ordered storage for dynamic properties.
///
/// Lookup and writes are O(1). [`remove`](Self::remove) and
/// [`remove_entry`](Self::remove_entry) are O(n) in the number of properties
/// added after the removed one, since the remaining order is preserved.
///
/// # Example
///
/// ```rust
/// use understory_expando::{PropertyStore, SetOutcome, Value};
///
/// let mut store = PropertyStore::new();
/// assert_eq!(store.set("Width", Value::new(100.0_f64)), SetOutcome::Added);
/// assert_eq!(store.set("Width", Value::new(120.0_f64)), SetOutcome::Updated);
/// assert_eq!(store.get("Width"), Some(&Value::new(120.0_f64)));
///
/// // The descriptor set follows the entries.
/// assert_eq!(store.descriptors().len(), 1);
/// assert!(store.remove("Width"));
/// assert!(store.descriptors().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    entries: IndexMap<String, PropertyEntry, DefaultHashBuilder>,
    descriptors: DescriptorSet,
}

impl PropertyStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty store with room for `capacity` properties.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, DefaultHashBuilder::default()),
            descriptors: DescriptorSet::with_capacity(capacity),
        }
    }

    /// Returns the number of stored properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no properties are stored.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a property named `name` is stored.
    #[must_use]
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Gets the value stored under `name`.
    ///
    /// Returns `None` if there is no such property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(PropertyEntry::value)
    }

    /// Gets the full entry stored under `name`.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&PropertyEntry> {
        self.entries.get(name)
    }

    /// Stores `value` under `name`, creating the property if needed.
    ///
    /// A new name gets a descriptor synthesized from the value's type. An
    /// existing name keeps its position; its descriptor's declared type is
    /// refreshed.
    pub fn set(&mut self, name: &str, value: Value) -> SetOutcome {
        match self.insert(name, value) {
            None => SetOutcome::Added,
            Some(_) => SetOutcome::Updated,
        }
    }

    /// Stores `value` under `name` like [`set`](Self::set), returning the
    /// value it replaced, if any.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        let value_type = value.type_tag();
        if let Some(entry) = self.entries.get_mut(name) {
            let previous = core::mem::replace(&mut entry.value, value);
            entry.value_type = value_type;
            self.descriptors.refresh(name, value_type);
            tracing::trace!(
                property = name,
                value_type = value_type.name(),
                "property updated"
            );
            Some(previous)
        } else {
            let entry = PropertyEntry::new(String::from(name), value);
            self.entries.insert(String::from(name), entry);
            self.descriptors.insert(name, value_type);
            tracing::trace!(
                property = name,
                value_type = value_type.name(),
                "property added"
            );
            self.debug_check_descriptors();
            None
        }
    }

    /// Removes the property named `name`.
    ///
    /// Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.remove_entry(name).is_some()
    }

    /// Removes the property named `name`, returning its entry.
    pub fn remove_entry(&mut self, name: &str) -> Option<PropertyEntry> {
        let removed = self.entries.shift_remove(name)?;
        self.descriptors.remove(name);
        tracing::trace!(property = name, "property removed");
        self.debug_check_descriptors();
        Some(removed)
    }

    /// Removes every property.
    ///
    /// Returns the removed names in their former order.
    pub fn clear(&mut self) -> Vec<String> {
        self.drain().into_iter().map(|entry| entry.name).collect()
    }

    /// Removes every property, returning the entries in their former order.
    pub fn drain(&mut self) -> Vec<PropertyEntry> {
        let removed: Vec<PropertyEntry> =
            self.entries.drain(..).map(|(_, entry)| entry).collect();
        self.descriptors.clear();
        tracing::trace!(count = removed.len(), "properties cleared");
        removed
    }

    /// Returns a snapshot of every `(name, value)` pair in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .values()
            .map(|entry| (entry.name.clone(), entry.value.clone()))
            .collect()
    }

    /// Returns an iterator over entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.values()
    }

    /// Returns an iterator over property names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the descriptors for the stored properties.
    #[must_use]
    #[inline]
    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    #[inline]
    fn debug_check_descriptors(&self) {
        debug_assert!(
            self.names().eq(self.descriptors.names()),
            "descriptor set out of step with entries"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn store_new() {
        let store = PropertyStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.descriptors().is_empty());
    }

    #[test]
    fn store_set_get() {
        let mut store = PropertyStore::with_capacity(4);

        assert!(store.get("Width").is_none());

        assert_eq!(store.set("Width", Value::new(100.0_f64)), SetOutcome::Added);
        assert_eq!(store.get("Width"), Some(&Value::new(100.0_f64)));
        assert!(store.contains_key("Width"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_update_retypes_entry_and_descriptor() {
        let mut store = PropertyStore::new();
        store.set("Value", Value::new(1_i32));
        assert_eq!(store.set("Value", Value::from("one")), SetOutcome::Updated);

        let entry = store.entry("Value").unwrap();
        assert_eq!(entry.name(), "Value");
        assert_eq!(entry.value_type(), TypeTag::of::<String>());
        assert_eq!(
            store.descriptors().get("Value").unwrap().declared_type(),
            TypeTag::of::<String>()
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_remove() {
        let mut store = PropertyStore::new();
        store.set("Width", Value::new(1_i32));

        assert!(store.remove("Width"));
        assert!(!store.contains_key("Width"));
        assert!(store.get("Width").is_none());
        assert!(store.descriptors().get("Width").is_none());

        // Removing non-existent returns false
        assert!(!store.remove("Width"));
    }

    #[test]
    fn store_insertion_order() {
        let mut store = PropertyStore::new();
        store.set("C", Value::new(3_i32));
        store.set("A", Value::new(1_i32));
        store.set("B", Value::new(2_i32));
        // Updating does not move an entry.
        store.set("C", Value::new(30_i32));
        store.remove("A");
        store.set("A", Value::new(10_i32));

        let names: Vec<_> = store.names().collect();
        assert_eq!(names, ["C", "B", "A"]);
        assert!(store.names().eq(store.descriptors().names()));
    }

    #[test]
    fn store_clear_reports_names_in_order() {
        let mut store = PropertyStore::new();
        store.set("a", Value::new(1_i32));
        store.set("b", Value::new(2_i32));

        assert_eq!(store.clear(), vec![String::from("a"), String::from("b")]);
        assert!(store.is_empty());
        assert!(store.descriptors().is_empty());
        assert!(store.clear().is_empty());
    }

    #[test]
    fn store_hands_back_displaced_values() {
        let mut store = PropertyStore::new();
        assert_eq!(store.insert("a", Value::new(1_i32)), None);
        assert_eq!(
            store.insert("a", Value::from("one")),
            Some(Value::new(1_i32))
        );
        store.insert("b", Value::new(2_i32));

        let removed = store.remove_entry("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(removed.value(), &Value::from("one"));
        assert!(store.remove_entry("a").is_none());
        assert!(store.descriptors().get("a").is_none());

        let drained = store.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].name(), "b");
        assert!(store.is_empty());
        assert!(store.descriptors().is_empty());
    }

    #[test]
    fn store_entries_is_a_snapshot() {
        let mut store = PropertyStore::new();
        store.set("a", Value::new(1_i32));
        let snapshot = store.entries();
        store.set("a", Value::new(2_i32));
        store.set("b", Value::new(3_i32));

        assert_eq!(snapshot, vec![(String::from("a"), Value::new(1_i32))]);
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn store_clone() {
        let mut store = PropertyStore::new();
        store.set("Width", Value::new(100.0_f64));

        let mut cloned = store.clone();
        cloned.remove("Width");
        assert_eq!(store.get("Width"), Some(&Value::new(100.0_f64)));
        assert!(cloned.descriptors().is_empty());
        assert_eq!(store.descriptors().len(), 1);
    }
}

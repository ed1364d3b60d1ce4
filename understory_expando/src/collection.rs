// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strict dictionary-style access.
//!
//! [`CollectionView`] is for consumers that treat the container as a
//! dictionary and want a missing or duplicate name reported as an error,
//! rather than the `None` returned by [`Expando::get`] and
//! [`DynamicObject`](crate::DynamicObject).
//!
//! The view owns nothing: every read and write goes through the
//! [`Expando`] it borrows, so subscribers see writes made here too.

use alloc::string::String;
use alloc::vec::{IntoIter, Vec};

use crate::error::{CapacityError, DuplicateKey, KeyNotFound};
use crate::expando::Expando;
use crate::value::Value;

/// A strict, dictionary-style view of an [`Expando`].
///
/// # Example
///
/// ```rust
/// use understory_expando::{DuplicateKey, Expando, KeyNotFound, Value};
///
/// let expando = Expando::new();
/// let dict = expando.collection();
///
/// dict.add("id", 1_u32).unwrap();
/// assert_eq!(
///     dict.add("id", 2_u32),
///     Err(DuplicateKey { name: "id".into() })
/// );
///
/// // `insert` overwrites instead.
/// dict.insert("id", 2_u32);
/// assert_eq!(dict.lookup("id"), Ok(Value::new(2_u32)));
///
/// assert_eq!(
///     dict.lookup("missing"),
///     Err(KeyNotFound { name: "missing".into() })
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CollectionView<'a> {
    expando: &'a Expando,
}

impl<'a> CollectionView<'a> {
    pub(crate) fn new(expando: &'a Expando) -> Self {
        Self { expando }
    }

    /// Returns the container this view reads and writes.
    #[must_use]
    pub fn expando(&self) -> &'a Expando {
        self.expando
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expando.len()
    }

    /// Returns `true` if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expando.is_empty()
    }

    /// Gets the value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] if there is no such property.
    pub fn lookup(&self, name: &str) -> Result<Value, KeyNotFound> {
        self.expando.get(name).ok_or_else(|| KeyNotFound {
            name: String::from(name),
        })
    }

    /// Gets the value stored under `name`, or `None`.
    #[must_use]
    pub fn try_get_value(&self, name: &str) -> Option<Value> {
        self.expando.get(name)
    }

    /// Stores `value` under `name`, creating or overwriting the property.
    pub fn insert(&self, name: &str, value: impl Into<Value>) {
        self.expando.set(name, value);
    }

    /// Adds a new property.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] and leaves the container unchanged if `name`
    /// is already present.
    pub fn add(&self, name: &str, value: impl Into<Value>) -> Result<(), DuplicateKey> {
        if self.expando.contains_key(name) {
            return Err(DuplicateKey {
                name: String::from(name),
            });
        }
        self.expando.set(name, value);
        Ok(())
    }

    /// Returns `true` if a property named `name` exists.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.expando.contains_key(name)
    }

    /// Returns `true` if `name` is present and its value equals `value`.
    ///
    /// Equality is that of the stored type; [`Callable`](crate::Callable)s
    /// compare by reference.
    #[must_use]
    pub fn contains_pair(&self, name: &str, value: &Value) -> bool {
        self.expando
            .get(name)
            .is_some_and(|current| current == *value)
    }

    /// Removes the property named `name`.
    ///
    /// Returns `true` if it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.expando.remove(name)
    }

    /// Removes the property named `name` only if its value equals `value`.
    ///
    /// Returns `true` if it was removed.
    pub fn remove_pair(&self, name: &str, value: &Value) -> bool {
        self.contains_pair(name, value) && self.expando.remove(name)
    }

    /// Removes every property.
    pub fn clear(&self) {
        self.expando.clear();
    }

    /// Returns the property names in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.expando.names()
    }

    /// Returns the property values in order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.expando.values()
    }

    /// Returns an iterator over a snapshot of every `(name, value)` pair.
    #[must_use]
    pub fn iter(&self) -> IntoIter<(String, Value)> {
        self.expando.entries().into_iter()
    }

    /// Writes every `(name, value)` pair into `buffer`, starting at `offset`.
    ///
    /// Slots outside `offset..offset + self.len()` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] without writing anything if `offset` is past
    /// the end of `buffer` or fewer than [`len`](Self::len) slots remain from
    /// it.
    pub fn copy_into(
        &self,
        buffer: &mut [Option<(String, Value)>],
        offset: usize,
    ) -> Result<(), CapacityError> {
        let entries = self.expando.entries();
        let available = buffer.len().saturating_sub(offset);
        if offset > buffer.len() || entries.len() > available {
            return Err(CapacityError {
                required: entries.len(),
                available,
                offset,
            });
        }
        for (slot, pair) in buffer[offset..].iter_mut().zip(entries) {
            *slot = Some(pair);
        }
        Ok(())
    }
}

impl IntoIterator for CollectionView<'_> {
    type Item = (String, Value);
    type IntoIter = IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::Callable;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    fn pair(name: &str, value: i32) -> Option<(String, Value)> {
        Some((String::from(name), Value::new(value)))
    }

    #[test]
    fn lookup_missing_is_key_not_found() {
        let expando = Expando::new();
        let dict = expando.collection();
        assert_eq!(
            dict.lookup("Width"),
            Err(KeyNotFound {
                name: String::from("Width")
            })
        );
        assert_eq!(dict.try_get_value("Width"), None);
    }

    #[test]
    fn add_rejects_existing_without_change() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.add("a", 1_i32).unwrap();

        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();
        expando.subscribe(move |_, _| *counter.borrow_mut() += 1);

        assert!(dict.add("a", 2_i32).is_err());
        assert_eq!(dict.lookup("a"), Ok(Value::new(1_i32)));
        assert_eq!(*changes.borrow(), 0);
    }

    #[test]
    fn insert_overwrites() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("a", 1_i32);
        dict.insert("a", 2_i32);
        assert_eq!(dict.lookup("a"), Ok(Value::new(2_i32)));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn contains_pair_uses_value_equality() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("n", 3_i32);
        dict.insert("s", "text");

        assert!(dict.contains_pair("n", &Value::new(3_i32)));
        assert!(!dict.contains_pair("n", &Value::new(4_i32)));
        assert!(!dict.contains_pair("n", &Value::new(3_i64)));
        assert!(dict.contains_pair("s", &Value::from("text")));
        assert!(!dict.contains_pair("missing", &Value::unit()));
    }

    #[test]
    fn contains_pair_callables_by_reference() {
        let expando = Expando::new();
        let dict = expando.collection();
        let f = Callable::from_fn0(|| 1_i32);
        dict.insert("f", f.clone());

        assert!(dict.contains_pair("f", &Value::from(f)));
        assert!(!dict.contains_pair("f", &Value::from(Callable::from_fn0(|| 1_i32))));
    }

    #[test]
    fn remove_pair_requires_match() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("a", 1_i32);

        assert!(!dict.remove_pair("a", &Value::new(2_i32)));
        assert!(dict.contains_key("a"));
        assert!(dict.remove_pair("a", &Value::new(1_i32)));
        assert!(dict.is_empty());
        assert!(!dict.remove("a"));
    }

    #[test]
    fn copy_into_at_offset() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("a", 1_i32);
        dict.insert("b", 2_i32);

        let mut buffer: Vec<Option<(String, Value)>> = vec![None; 4];
        dict.copy_into(&mut buffer, 1).unwrap();
        assert_eq!(buffer, [None, pair("a", 1), pair("b", 2), None]);
    }

    #[test]
    fn copy_into_insufficient_room_writes_nothing() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("a", 1_i32);
        dict.insert("b", 2_i32);

        let mut buffer: Vec<Option<(String, Value)>> = vec![None; 2];
        assert_eq!(
            dict.copy_into(&mut buffer, 1),
            Err(CapacityError {
                required: 2,
                available: 1,
                offset: 1
            })
        );
        assert!(buffer.iter().all(Option::is_none));

        // An offset past the end has no room at all.
        assert_eq!(
            dict.copy_into(&mut buffer, 5),
            Err(CapacityError {
                required: 2,
                available: 0,
                offset: 5
            })
        );
    }

    #[test]
    fn copy_into_empty_checks_offset() {
        let expando = Expando::new();
        let dict = expando.collection();
        let mut buffer: Vec<Option<(String, Value)>> = vec![None; 1];
        assert!(dict.copy_into(&mut buffer, 1).is_ok());
        assert!(dict.copy_into(&mut buffer, 2).is_err());
    }

    #[test]
    fn keys_values_and_iteration_follow_insertion_order() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("b", 2_i32);
        dict.insert("a", 1_i32);

        assert_eq!(dict.keys(), ["b", "a"]);
        assert_eq!(dict.values(), [Value::new(2_i32), Value::new(1_i32)]);

        let names: Vec<String> = dict.into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn clear_through_view() {
        let expando = Expando::new();
        let dict = expando.collection();
        dict.insert("a", 1_i32);
        dict.clear();
        assert!(expando.is_empty());
        assert!(Expando::ptr_eq(dict.expando(), &expando));
    }
}

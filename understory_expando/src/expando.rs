// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dynamic property container.
//!
//! [`Expando`] composes a [`PropertyStore`], its [`DescriptorSet`] and a
//! [`ChangeNotifier`] behind one shared handle, and exposes them through
//! three access styles:
//!
//! - its own inherent methods and [`DynamicObject`], which never fail on a
//!   missing name,
//! - [`CollectionView`], which reports missing or duplicate names as errors,
//! - [`descriptors`](Expando::descriptors) and
//!   [`describe`](Expando::describe) for inspector tooling.
//!
//! # Ordering
//!
//! Every mutation completes in the store (entries and descriptors together)
//! before any handler runs. The store is not borrowed while handlers or
//! callables run, nor while replaced and removed values are dropped, so
//! those may read or mutate the container.

use alloc::borrow::Cow;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::collection::CollectionView;
use crate::metadata::{Descriptor, DescriptorSet};
use crate::notify::{ChangeNotifier, PropertyChanged, SubscriptionId};
use crate::resolver::DynamicObject;
use crate::store::PropertyStore;
use crate::value::Value;

const DEFAULT_CLASS_NAME: &str = "Expando";

struct Inner {
    class_name: Cow<'static, str>,
    store: RefCell<PropertyStore>,
    notifier: ChangeNotifier<Expando>,
}

/// A shared, dynamically-extensible property container.
///
/// Cloning an `Expando` produces another handle to the same container. The
/// container is single-threaded and is dropped with its last strong handle.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_expando::{Expando, TypeTag, Value};
///
/// let expando = Expando::new();
/// let changes = Rc::new(RefCell::new(Vec::new()));
/// let log = changes.clone();
/// expando.subscribe(move |_, event| log.borrow_mut().push(event.property_name().to_owned()));
///
/// expando.set("name", "Alice");
/// assert_eq!(expando.get("name"), Some(Value::from("Alice")));
///
/// let descriptors = expando.descriptors();
/// assert_eq!(descriptors.len(), 1);
/// assert_eq!(descriptors[0].declared_type(), TypeTag::of::<String>());
///
/// assert!(expando.remove("name"));
/// assert!(expando.is_empty());
/// assert!(expando.descriptors().is_empty());
/// assert_eq!(*changes.borrow(), ["name", "name"]);
/// ```
#[derive(Clone)]
pub struct Expando {
    inner: Rc<Inner>,
}

impl Expando {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        ExpandoBuilder::new().build()
    }

    /// Returns a builder for configuring a container.
    #[must_use]
    pub fn builder() -> ExpandoBuilder {
        ExpandoBuilder::new()
    }

    /// Returns the component name reported to inspector tooling.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.inner.class_name
    }

    /// Returns `true` if both handles refer to the same container.
    #[must_use]
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }

    /// Creates a weak handle that does not keep the container alive.
    ///
    /// Handlers and callables stored in the container should capture this
    /// rather than a strong handle, which would form a reference cycle.
    #[must_use]
    pub fn downgrade(&self) -> WeakExpando {
        WeakExpando {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Property access
    // =========================================================================

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.store.borrow().len()
    }

    /// Returns `true` if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.store.borrow().is_empty()
    }

    /// Returns `true` if a property named `name` exists.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.store.borrow().contains_key(name)
    }

    /// Gets a clone of the value stored under `name`.
    ///
    /// Returns `None` if there is no such property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.store.borrow().get(name).cloned()
    }

    /// Stores `value` under `name`, creating the property if needed, then
    /// notifies subscribers.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let previous = self.inner.store.borrow_mut().insert(name, value);
        // Dropped after the borrow ends; a value's `Drop` may read the container.
        drop(previous);
        self.inner.notifier.notify(self, name);
    }

    /// Removes the property named `name`, notifying subscribers if it
    /// existed.
    ///
    /// Returns `true` if it existed.
    pub fn remove(&self, name: &str) -> bool {
        let Some(removed) = self.inner.store.borrow_mut().remove_entry(name) else {
            return false;
        };
        drop(removed);
        self.inner.notifier.notify(self, name);
        true
    }

    /// Removes every property.
    ///
    /// Subscribers are notified once per removed name, in the former order,
    /// after the container is empty.
    pub fn clear(&self) {
        let removed = self.inner.store.borrow_mut().drain();
        let names: Vec<String> = removed
            .into_iter()
            .map(|entry| String::from(entry.name()))
            .collect();
        for name in &names {
            self.inner.notifier.notify(self, name);
        }
    }

    /// Returns a snapshot of every `(name, value)` pair in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner.store.borrow().entries()
    }

    /// Returns the property names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner
            .store
            .borrow()
            .names()
            .map(String::from)
            .collect()
    }

    /// Returns the property values in order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.inner
            .store
            .borrow()
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns the strict, dictionary-style view of this container.
    #[must_use]
    pub fn collection(&self) -> CollectionView<'_> {
        CollectionView::new(self)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Returns a descriptor for every property, in property order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.with_descriptors(|set| set.iter().cloned().collect())
    }

    /// Returns the descriptor for `name`, if the property exists.
    #[must_use]
    pub fn describe(&self, name: &str) -> Option<Descriptor> {
        self.with_descriptors(|set| set.get(name).cloned())
    }

    fn with_descriptors<R>(&self, f: impl FnOnce(&DescriptorSet) -> R) -> R {
        f(self.inner.store.borrow().descriptors())
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Subscribes `handler` to change events.
    ///
    /// The handler receives this container and the event. It stays
    /// subscribed until [`unsubscribe`](Self::unsubscribe) is called with the
    /// returned id.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Self, &PropertyChanged) + 'static,
    {
        self.inner.notifier.subscribe(handler)
    }

    /// Unsubscribes the handler registered as `id`.
    ///
    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    /// Returns the number of subscribed handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifier.len()
    }
}

impl Default for Expando {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Expando {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.inner.store.try_borrow();
        f.debug_struct("Expando")
            .field("class_name", &self.inner.class_name)
            .field("properties", &store.map(|store| store.len()).ok())
            .field("subscribers", &self.inner.notifier.len())
            .finish()
    }
}

impl DynamicObject for Expando {
    fn try_get_member(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    fn try_set_member(&self, name: &str, value: Value) {
        self.set(name, value);
    }

    fn dynamic_member_names(&self) -> Vec<String> {
        self.names()
    }
}

/// A weak handle to an [`Expando`].
#[derive(Clone, Debug)]
pub struct WeakExpando {
    inner: Weak<Inner>,
}

impl WeakExpando {
    /// Returns a strong handle if the container is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Expando> {
        self.inner.upgrade().map(|inner| Expando { inner })
    }
}

/// Builder for [`Expando`].
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_expando::Expando;
///
/// let changes = Rc::new(Cell::new(0));
/// let counter = changes.clone();
/// let expando = Expando::builder()
///     .class_name("Customer")
///     .capacity(8)
///     .on_changed(move |_, _| counter.set(counter.get() + 1))
///     .build();
///
/// expando.set("id", 7_u32);
/// assert_eq!(expando.class_name(), "Customer");
/// assert_eq!(changes.get(), 1);
/// ```
pub struct ExpandoBuilder {
    class_name: Cow<'static, str>,
    capacity: usize,
    notifier: ChangeNotifier<Expando>,
}

impl ExpandoBuilder {
    /// Creates a builder with the default class name and no capacity hint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_name: Cow::Borrowed(DEFAULT_CLASS_NAME),
            capacity: 0,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Sets the component name reported by [`Expando::class_name`].
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<Cow<'static, str>>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Reserves room for `capacity` properties.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Subscribes a handler before the container is handed out.
    ///
    /// Can be called more than once; handlers run in the order added.
    #[must_use]
    pub fn on_changed<F>(self, handler: F) -> Self
    where
        F: Fn(&Expando, &PropertyChanged) + 'static,
    {
        self.notifier.subscribe(handler);
        self
    }

    /// Builds the [`Expando`].
    #[must_use]
    pub fn build(self) -> Expando {
        Expando {
            inner: Rc::new(Inner {
                class_name: self.class_name,
                store: RefCell::new(PropertyStore::with_capacity(self.capacity)),
                notifier: self.notifier,
            }),
        }
    }
}

impl Default for ExpandoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpandoBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandoBuilder")
            .field("class_name", &self.class_name)
            .field("capacity", &self.capacity)
            .field("handlers", &self.notifier.len())
            .finish()
    }
}

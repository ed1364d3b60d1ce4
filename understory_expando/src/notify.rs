// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronous property-change notification.
//!
//! [`ChangeNotifier`] is an ordered list of handlers. Events are delivered
//! inline, in registration order.
//!
//! # Reentrancy
//!
//! The handler list is borrowed only long enough to take a snapshot, so a
//! handler may subscribe, unsubscribe, or mutate the sender while an event is
//! being delivered. Each event goes to the handlers that were subscribed when
//! its delivery started.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{Cell, RefCell};
use core::fmt;
use smallvec::SmallVec;

/// Inline capacity for the handler list.
///
/// Most containers have one or two observers (typically a binding layer), so
/// this avoids a heap allocation in the common case.
const INLINE_SUBSCRIBERS: usize = 4;

/// Handle returned by [`ChangeNotifier::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw identifier.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Event describing a change to one property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyChanged {
    name: String,
}

impl PropertyChanged {
    /// Creates an event for the property named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the property that changed.
    #[must_use]
    #[inline]
    pub fn property_name(&self) -> &str {
        &self.name
    }
}

type Handler<S> = Rc<dyn Fn(&S, &PropertyChanged)>;
type HandlerList<S> = SmallVec<[(SubscriptionId, Handler<S>); INLINE_SUBSCRIBERS]>;

/// An ordered list of change handlers.
///
/// `S` is the sender type passed to each handler alongside the event.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_expando::ChangeNotifier;
///
/// let notifier = ChangeNotifier::<()>::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = seen.clone();
/// let id = notifier.subscribe(move |_, event| {
///     log.borrow_mut().push(event.property_name().to_owned());
/// });
///
/// notifier.notify(&(), "Width");
/// assert!(notifier.unsubscribe(id));
/// notifier.notify(&(), "Height");
///
/// assert_eq!(*seen.borrow(), ["Width"]);
/// ```
pub struct ChangeNotifier<S> {
    handlers: RefCell<HandlerList<S>>,
    next_id: Cell<u64>,
}

impl<S> ChangeNotifier<S> {
    /// Creates a notifier with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(SmallVec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Returns the number of subscribed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Returns `true` if no handlers are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Appends `handler` to the list.
    ///
    /// The notifier keeps the handler alive until it is unsubscribed.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&S, &PropertyChanged) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let handler: Handler<S> = Rc::new(handler);
        self.handlers.borrow_mut().push((id, handler));
        tracing::trace!(subscription = id.0, "handler subscribed");
        id
    }

    /// Removes the handler registered as `id`.
    ///
    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(index) = handlers.iter().position(|(sub, _)| *sub == id) else {
            return false;
        };
        let (_, handler) = handlers.remove(index);
        // Release the list before the handler's captures drop.
        drop(handlers);
        drop(handler);
        tracing::trace!(subscription = id.0, "handler unsubscribed");
        true
    }

    /// Delivers a change event for `name` to every subscribed handler, in
    /// registration order.
    pub fn notify(&self, sender: &S, name: &str) {
        let snapshot: SmallVec<[Handler<S>; INLINE_SUBSCRIBERS]> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        if snapshot.is_empty() {
            return;
        }
        let event = PropertyChanged::new(name);
        for handler in snapshot {
            handler(sender, &event);
        }
    }
}

impl<S> Default for ChangeNotifier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for ChangeNotifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("handlers", &self.len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

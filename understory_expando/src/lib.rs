// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Expando: a dynamically-extensible property container.
//!
//! An [`Expando`] is an object whose members are not fixed at definition
//! time. Properties are added, updated and removed at runtime, looked up and
//! invoked by name, observed through change notifications, and described
//! for inspector and binding tooling.
//!
//! ## Core Concepts
//!
//! ### One store, several views
//!
//! Every [`Expando`] is backed by a single [`PropertyStore`], an
//! insertion-ordered map from names to type-erased [`Value`]s. The other
//! facets are views over it:
//!
//! - **Soft access**: [`Expando::get`] / [`Expando::set`] and the
//!   [`DynamicObject`] trait. A missing name is `None`, never an error.
//! - **Strict access**: [`CollectionView`], returned by
//!   [`Expando::collection`]. A missing name is [`KeyNotFound`]; adding an
//!   existing name is [`DuplicateKey`].
//! - **Metadata**: one [`Descriptor`] per property, maintained by the store
//!   in the same call that changes its entries, so the descriptor set and
//!   the property set are never observed out of step.
//! - **Change notification**: handlers registered with
//!   [`Expando::subscribe`] run synchronously, in registration order, after
//!   each mutation completes.
//!
//! ### Values
//!
//! A [`Value`] wraps any `Clone + PartialEq + 'static` type together with its
//! [`TypeTag`]. The tag becomes the property's declared type and is refreshed
//! on every write. A [`Callable`] stored as a value can be invoked by name
//! with [`DynamicObject::try_invoke_member`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_expando::{Callable, DynamicObject, Expando, TypeTag, Value};
//!
//! let person = Expando::new();
//!
//! // Watch for changes.
//! let changed = Rc::new(RefCell::new(Vec::new()));
//! let log = changed.clone();
//! person.subscribe(move |_, event| log.borrow_mut().push(event.property_name().to_owned()));
//!
//! // Add members at runtime.
//! person.set("name", "Alice");
//! person.set("age", 36_u32);
//! person.set("greet", Callable::from_fn1(|other: String| format!("Hi {other}!")));
//!
//! // Soft lookup.
//! assert_eq!(person.get("name"), Some(Value::from("Alice")));
//! assert_eq!(person.get("email"), None);
//!
//! // Invoke a stored callable by name.
//! let reply = person.try_invoke_member("greet", &[Value::from("Bob")]).unwrap();
//! assert_eq!(reply, Some(Value::from("Hi Bob!")));
//!
//! // Inspect metadata.
//! let types: Vec<_> = person.descriptors().iter().map(|d| d.declared_type()).collect();
//! assert_eq!(types[1], TypeTag::of::<u32>());
//!
//! // Strict access.
//! assert!(person.collection().lookup("email").is_err());
//!
//! assert_eq!(*changed.borrow(), ["name", "age", "greet"]);
//! ```
//!
//! ## Threading
//!
//! An [`Expando`] is a single-threaded shared handle (`Rc` + `RefCell`). It
//! is neither `Send` nor `Sync`. Handlers and callables run inline on the
//! caller's thread and may themselves read or mutate the container.
//!
//! ## Logging
//!
//! Store and subscription changes are reported as `trace` events, and failed
//! invocations as `debug` events, through [`tracing`]. The crate installs no
//! subscriber; failures are always reported through return values.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod callable;
mod collection;
mod error;
mod expando;
mod metadata;
mod notify;
mod resolver;
mod store;
mod value;

pub use callable::{Callable, CallableFn};
pub use collection::CollectionView;
pub use error::{CapacityError, DuplicateKey, InvocationError, KeyNotFound};
pub use expando::{Expando, ExpandoBuilder, WeakExpando};
pub use metadata::{Descriptor, DescriptorFlags, DescriptorSet};
pub use notify::{ChangeNotifier, PropertyChanged, SubscriptionId};
pub use resolver::DynamicObject;
pub use store::{PropertyEntry, PropertyStore, SetOutcome};
pub use value::{TypeTag, Value};

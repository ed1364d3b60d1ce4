// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Late-bound member access.
//!
//! This module provides the [`DynamicObject`] trait for objects whose members
//! are looked up by name at runtime. Every operation is soft: a missing
//! member is reported as `None`, never as an error.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::InvocationError;
use crate::value::Value;

/// An object whose members are resolved by name at runtime.
///
/// Implementors provide get, set and name enumeration;
/// [`try_invoke_member`](Self::try_invoke_member) is built on top of
/// [`try_get_member`](Self::try_get_member).
///
/// Members are read and written through `&self`, so implementors use interior
/// mutability. Implementations must not hold a borrow of their storage while
/// returning a value, because invocation runs user code that may access the
/// same object.
///
/// # Example
///
/// ```rust
/// use understory_expando::{Callable, DynamicObject, Expando, Value};
///
/// let expando = Expando::new();
/// let greet = Callable::from_fn1(|name: String| format!("Hello, {name}"));
/// expando.try_set_member("greet", greet.into());
///
/// let greeting = expando
///     .try_invoke_member("greet", &[Value::from("Ada")])
///     .unwrap();
/// assert_eq!(greeting, Some(Value::from("Hello, Ada")));
///
/// // Missing members and non-callable members are not handled.
/// assert_eq!(expando.try_invoke_member("missing", &[]), Ok(None));
/// ```
pub trait DynamicObject {
    /// Gets a member's value.
    ///
    /// Returns `None` if there is no member named `name`.
    fn try_get_member(&self, name: &str) -> Option<Value>;

    /// Sets a member's value, creating the member if needed.
    fn try_set_member(&self, name: &str, value: Value);

    /// Returns the names of the current members, in order.
    fn dynamic_member_names(&self) -> Vec<String>;

    /// Invokes a callable member with `args`.
    ///
    /// Returns `Ok(None)` if there is no member named `name` or if the member
    /// is not a [`Callable`](crate::Callable), and `Ok(Some(result))` when
    /// the call succeeds.
    ///
    /// # Errors
    ///
    /// Returns the callable's own [`InvocationError`] unchanged.
    fn try_invoke_member(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Value>, InvocationError> {
        let Some(member) = self.try_get_member(name) else {
            return Ok(None);
        };
        let Some(callable) = member.as_callable() else {
            return Ok(None);
        };
        match callable.invoke(args) {
            Ok(result) => Ok(Some(result)),
            Err(error) => {
                tracing::debug!(member = name, %error, "member invocation failed");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::Callable;
    use crate::expando::Expando;
    use alloc::collections::BTreeMap;
    use core::cell::RefCell;

    /// Minimal implementor to check the provided method in isolation.
    #[derive(Default)]
    struct Bag(RefCell<BTreeMap<String, Value>>);

    impl DynamicObject for Bag {
        fn try_get_member(&self, name: &str) -> Option<Value> {
            self.0.borrow().get(name).cloned()
        }

        fn try_set_member(&self, name: &str, value: Value) {
            self.0.borrow_mut().insert(String::from(name), value);
        }

        fn dynamic_member_names(&self) -> Vec<String> {
            self.0.borrow().keys().cloned().collect()
        }
    }

    #[test]
    fn invoke_applies_callable_to_args() {
        let bag = Bag::default();
        bag.try_set_member("add", Callable::from_fn2(|a: i32, b: i32| a + b).into());

        let result = bag
            .try_invoke_member("add", &[Value::new(2_i32), Value::new(40_i32)])
            .unwrap();
        assert_eq!(result, Some(Value::new(42_i32)));
    }

    #[test]
    fn invoke_missing_or_not_callable_is_unhandled() {
        let bag = Bag::default();
        bag.try_set_member("count", Value::new(3_i32));

        assert_eq!(bag.try_invoke_member("missing", &[]), Ok(None));
        assert_eq!(bag.try_invoke_member("count", &[]), Ok(None));
    }

    #[test]
    fn invoke_propagates_callable_failure() {
        let bag = Bag::default();
        bag.try_set_member(
            "fail",
            Callable::new(|_| Err(InvocationError::failed("nope"))).into(),
        );
        bag.try_set_member("one", Callable::from_fn1(|x: i32| x).into());

        assert_eq!(
            bag.try_invoke_member("fail", &[]),
            Err(InvocationError::Failed(String::from("nope")))
        );
        assert_eq!(
            bag.try_invoke_member("one", &[]),
            Err(InvocationError::ArgumentCount {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn expando_resolves_members() {
        let expando = Expando::new();
        assert_eq!(expando.try_get_member("name"), None);

        expando.try_set_member("name", Value::from("Alice"));
        expando.try_set_member("name", Value::from("Bob"));
        assert_eq!(expando.try_get_member("name"), Some(Value::from("Bob")));
        assert_eq!(expando.dynamic_member_names(), [String::from("name")]);
    }

    #[test]
    fn callable_may_mutate_its_owner() {
        let expando = Expando::new();
        expando.set("count", 0_i32);

        // Handlers and callables get at the container through a weak handle.
        let weak = expando.downgrade();
        expando.set(
            "increment",
            Callable::from_fn0(move || {
                let Some(owner) = weak.upgrade() else {
                    return 0;
                };
                let next = owner
                    .get("count")
                    .and_then(|v| v.downcast_ref::<i32>().copied())
                    .unwrap_or_default()
                    + 1;
                owner.set("count", next);
                next
            }),
        );

        assert_eq!(
            expando.try_invoke_member("increment", &[]),
            Ok(Some(Value::new(1_i32)))
        );
        assert_eq!(expando.get("count"), Some(Value::new(1_i32)));
    }
}

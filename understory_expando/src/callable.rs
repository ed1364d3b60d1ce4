// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invocable property values.
//!
//! A [`Callable`] is a value that can be stored in an
//! [`Expando`](crate::Expando) and invoked by name through
//! [`DynamicObject::try_invoke_member`](crate::DynamicObject::try_invoke_member).

use alloc::rc::Rc;
use core::fmt;

use crate::error::InvocationError;
use crate::value::{TypeTag, Value};

/// Signature shared by every callable: an ordered argument slice in, a value
/// or an invocation failure out.
pub type CallableFn = dyn Fn(&[Value]) -> Result<Value, InvocationError>;

/// A shared, invocable function value.
///
/// Clones share the same underlying function. Two callables compare equal
/// only if they share it, so equality is by reference.
///
/// The typed constructors ([`Callable::from_fn0`], [`Callable::from_fn1`],
/// [`Callable::from_fn2`]) check the argument count and argument types before
/// calling the wrapped function, reporting mismatches as
/// [`InvocationError`]s.
///
/// # Example
///
/// ```rust
/// use understory_expando::{Callable, InvocationError, Value};
///
/// let add = Callable::from_fn2(|a: i32, b: i32| a + b);
/// let sum = add.invoke(&[Value::new(2_i32), Value::new(3_i32)]).unwrap();
/// assert_eq!(sum, Value::new(5_i32));
///
/// let err = add.invoke(&[Value::new(2_i32)]).unwrap_err();
/// assert_eq!(err, InvocationError::ArgumentCount { expected: 2, found: 1 });
/// ```
#[derive(Clone)]
pub struct Callable(Rc<CallableFn>);

impl Callable {
    /// Wraps a function that receives the raw argument slice.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, InvocationError> + 'static,
    {
        Self(Rc::new(f))
    }

    /// Wraps a function taking no arguments.
    #[must_use]
    pub fn from_fn0<R, F>(f: F) -> Self
    where
        R: Into<Value>,
        F: Fn() -> R + 'static,
    {
        Self::new(move |args| {
            expect_arity(args, 0)?;
            Ok(f().into())
        })
    }

    /// Wraps a function taking one argument of type `A`.
    #[must_use]
    pub fn from_fn1<A, R, F>(f: F) -> Self
    where
        A: Clone + 'static,
        R: Into<Value>,
        F: Fn(A) -> R + 'static,
    {
        Self::new(move |args| {
            expect_arity(args, 1)?;
            Ok(f(argument(args, 0)?).into())
        })
    }

    /// Wraps a function taking two arguments of types `A` and `B`.
    #[must_use]
    pub fn from_fn2<A, B, R, F>(f: F) -> Self
    where
        A: Clone + 'static,
        B: Clone + 'static,
        R: Into<Value>,
        F: Fn(A, B) -> R + 'static,
    {
        Self::new(move |args| {
            expect_arity(args, 2)?;
            Ok(f(argument(args, 0)?, argument(args, 1)?).into())
        })
    }

    /// Invokes the function with `args`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`InvocationError`] the function reports.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, InvocationError> {
        (self.0)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

fn expect_arity(args: &[Value], expected: usize) -> Result<(), InvocationError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvocationError::ArgumentCount {
            expected,
            found: args.len(),
        })
    }
}

/// Extracts argument `index` as a `T`.
fn argument<T: Clone + 'static>(args: &[Value], index: usize) -> Result<T, InvocationError> {
    let value = &args[index];
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or(InvocationError::ArgumentType {
            index,
            expected: TypeTag::of::<T>(),
            found: value.type_tag(),
        })
}

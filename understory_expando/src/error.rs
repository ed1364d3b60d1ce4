// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Soft lookups ([`Expando::get`](crate::Expando::get),
//! [`DynamicObject::try_get_member`](crate::DynamicObject::try_get_member))
//! never fail; they return `None` instead. The errors here come from the
//! strict [`CollectionView`](crate::CollectionView) and from invoking
//! [`Callable`](crate::Callable) values.

use alloc::string::String;
use thiserror::Error;

use crate::value::TypeTag;

/// Error returned when a strict lookup names a missing property.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no property named `{name}`")]
pub struct KeyNotFound {
    /// The property name that was looked up.
    pub name: String,
}

/// Error returned when adding a property whose name is already taken.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("a property named `{name}` already exists")]
pub struct DuplicateKey {
    /// The property name that was already present.
    pub name: String,
}

/// Error reported by a [`Callable`](crate::Callable) that could not complete.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The callable was given the wrong number of arguments.
    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount {
        /// Number of arguments the callable accepts.
        expected: usize,
        /// Number of arguments it was given.
        found: usize,
    },
    /// An argument had the wrong type.
    #[error("argument {index} has type `{found}`, expected `{expected}`")]
    ArgumentType {
        /// Zero-based position of the offending argument.
        index: usize,
        /// Type the callable accepts at that position.
        expected: TypeTag,
        /// Type that was supplied.
        found: TypeTag,
    },
    /// The callable ran and failed.
    #[error("{0}")]
    Failed(String),
}

impl InvocationError {
    /// Creates an [`InvocationError::Failed`] with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error returned when a destination buffer is too small to receive every
/// property.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{required} slot(s) required from offset {offset}, only {available} available")]
pub struct CapacityError {
    /// Number of pairs that needed to be written.
    pub required: usize,
    /// Slots remaining in the destination from `offset`.
    pub available: usize,
    /// Offset at which writing was requested.
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        let missing = KeyNotFound {
            name: "Width".to_string(),
        };
        assert_eq!(missing.to_string(), "no property named `Width`");

        let duplicate = DuplicateKey {
            name: "Width".to_string(),
        };
        assert_eq!(
            duplicate.to_string(),
            "a property named `Width` already exists"
        );

        let ty = InvocationError::ArgumentType {
            index: 1,
            expected: TypeTag::of::<i32>(),
            found: TypeTag::of::<bool>(),
        };
        assert_eq!(ty.to_string(), "argument 1 has type `bool`, expected `i32`");

        let capacity = CapacityError {
            required: 3,
            available: 1,
            offset: 4,
        };
        assert_eq!(
            capacity.to_string(),
            "3 slot(s) required from offset 4, only 1 available"
        );
    }

    #[test]
    fn errors_are_core_errors() {
        fn assert_error<E: core::error::Error>() {}
        assert_error::<KeyNotFound>();
        assert_error::<DuplicateKey>();
        assert_error::<InvocationError>();
        assert_error::<CapacityError>();
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::FallbackError;

/// One item of a source: a value, or the error that ends the source.
///
/// A fallback stream looks at the first `Error` of each source to decide whether the
/// next source takes over (the error is suppressed) or the combined stream fails
/// (the error is forwarded). Values are never inspected.
///
/// # Examples
///
/// ```
/// use fallback_core::{FallbackError, StreamItem};
///
/// let value: StreamItem<u32> = Ok(7).into();
/// let failure: StreamItem<u32> = Err(FallbackError::stream_error("mirror offline")).into();
///
/// assert_eq!(value.as_value(), Some(&7));
/// assert!(failure.as_error().is_some());
/// ```
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    Value(T),
    Error(FallbackError),
}

// Two errors never compare equal, even when they wrap the same failure
impl<T: PartialEq> PartialEq for StreamItem<T> {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (Self::Value(a), Self::Value(b)) if a == b)
    }
}

impl<T> StreamItem<T> {
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Borrows the value, if any.
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Borrows the error, if any.
    pub const fn as_error(&self) -> Option<&FallbackError> {
        match self {
            Self::Value(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// The value, discarding an error.
    pub fn ok(self) -> Option<T> {
        Result::from(self).ok()
    }

    /// The error, discarding a value.
    pub fn err(self) -> Option<FallbackError> {
        Result::from(self).err()
    }

    /// Transforms the value and leaves an error untouched.
    pub fn map<U, F>(self, f: F) -> StreamItem<U>
    where
        F: FnOnce(T) -> U,
    {
        Result::from(self).map(f).into()
    }

    /// # Panics
    ///
    /// Panics if the item is an `Error`.
    pub fn unwrap(self) -> T {
        self.expect("called `StreamItem::unwrap()` on an `Error` value")
    }

    /// # Panics
    ///
    /// Panics with `msg` if the item is an `Error`.
    pub fn expect(self, msg: &str) -> T {
        match self {
            Self::Value(value) => value,
            Self::Error(error) => panic!("{msg}: {error:?}"),
        }
    }
}

impl<T> From<Result<T, FallbackError>> for StreamItem<T> {
    fn from(result: Result<T, FallbackError>) -> Self {
        result.map_or_else(Self::Error, Self::Value)
    }
}

impl<T> From<StreamItem<T>> for Result<T, FallbackError> {
    fn from(item: StreamItem<T>) -> Self {
        match item {
            StreamItem::Value(value) => Ok(value),
            StreamItem::Error(error) => Err(error),
        }
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The policy deciding whether a source error triggers fallback.
//!
//! An [`ErrorFilter`] returns:
//! - `true` to suppress the error and continue with the next source
//! - `false` to propagate the error to the consumer
//!
//! # Examples
//!
//! ```
//! use fallback_core::{ErrorFilter, FallbackError};
//!
//! let timeouts_only = ErrorFilter::from_pattern("timed out");
//!
//! assert!(timeouts_only.matches(&FallbackError::stream_error("request timed out")));
//! assert!(!timeouts_only.matches(&FallbackError::stream_error("permission denied")));
//! ```

use crate::error::FallbackError;
use std::fmt;
use std::sync::Arc;

/// A text matcher applied to an error's `Display` output.
///
/// Plain strings match as substrings and [`regex::Regex`] matches as a regular
/// expression. Implement this for other matcher types to plug them into
/// [`ErrorFilter::from_pattern`].
pub trait ErrorPattern {
    /// Returns `true` if `text` matches this pattern.
    fn is_match(&self, text: &str) -> bool;
}

/// Substring match.
impl ErrorPattern for str {
    fn is_match(&self, text: &str) -> bool {
        text.contains(self)
    }
}

/// Substring match.
impl ErrorPattern for String {
    fn is_match(&self, text: &str) -> bool {
        self.as_str().is_match(text)
    }
}

/// Regular expression search anywhere in the text.
impl ErrorPattern for regex::Regex {
    fn is_match(&self, text: &str) -> bool {
        Self::is_match(self, text)
    }
}

/// Matches if any of the contained substrings matches.
impl ErrorPattern for Vec<String> {
    fn is_match(&self, text: &str) -> bool {
        self.iter().any(|pattern| pattern.is_match(text))
    }
}

impl<P: ErrorPattern + ?Sized> ErrorPattern for &P {
    fn is_match(&self, text: &str) -> bool {
        (**self).is_match(text)
    }
}

type Decision = dyn Fn(&FallbackError) -> bool + Send + Sync;

/// A normalized `(error) -> bool` decision function.
///
/// Cloning is cheap: clones share the same underlying predicate.
#[derive(Clone)]
pub struct ErrorFilter {
    decide: Arc<Decision>,
    kind: FilterKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FilterKind {
    Always,
    Predicate,
    Pattern,
}

impl ErrorFilter {
    /// A filter that suppresses every error. This is the default policy.
    #[must_use]
    pub fn always() -> Self {
        Self {
            decide: Arc::new(|_| true),
            kind: FilterKind::Always,
        }
    }

    /// Use a predicate as-is.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&FallbackError) -> bool + Send + Sync + 'static,
    {
        Self {
            decide: Arc::new(predicate),
            kind: FilterKind::Predicate,
        }
    }

    /// Test the error's textual representation against `pattern`.
    pub fn from_pattern<P>(pattern: P) -> Self
    where
        P: ErrorPattern + Send + Sync + 'static,
    {
        Self {
            decide: Arc::new(move |error: &FallbackError| pattern.is_match(&error.to_string())),
            kind: FilterKind::Pattern,
        }
    }

    /// Returns `true` if `error` should trigger fallback.
    #[must_use]
    pub fn matches(&self, error: &FallbackError) -> bool {
        (self.decide)(error)
    }

    /// Returns `true` if this is the default filter suppressing every error.
    #[must_use]
    pub fn is_always(&self) -> bool {
        self.kind == FilterKind::Always
    }
}

impl Default for ErrorFilter {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for ErrorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorFilter")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

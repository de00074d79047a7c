// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for fallback stream concatenation.
//!
//! A single [`FallbackError`] covers both families of failures:
//!
//! - **Configuration errors** (invalid source entry, factory producing no stream, invalid
//!   filter specification, malformed options). These are never passed to an error filter.
//! - **Source errors** raised by the streams being concatenated. These are the errors an
//!   [`ErrorFilter`](crate::ErrorFilter) decides to suppress or propagate.
//!
//! # Examples
//!
//! ```
//! use fallback_core::{FallbackError, Result};
//!
//! fn open_primary() -> Result<()> {
//!     Err(FallbackError::stream_error("primary not reachable"))
//! }
//!
//! assert!(open_primary().is_err());
//! ```

use std::sync::Arc;

/// Root error type for all fallback stream operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FallbackError {
    /// An error raised by one of the concatenated sources.
    ///
    /// The wrapped error is shared, so every observer of the failure sees the
    /// same error object. Its `Display` output is the inner error's text, which is
    /// what pattern filters match against.
    #[error("{0}")]
    Source(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Stream processing encountered an error
    ///
    /// This is a general error for stream operations that don't fit
    /// other specific categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// A source entry held neither a stream nor a factory.
    #[error("All items in the list must be a readable stream or a function (source {index})")]
    InvalidSource {
        /// Position of the entry in the source list
        index: usize,
    },

    /// A factory source produced no stream when invoked.
    #[error("All functions in the list must return a readable stream (source {index})")]
    InvalidFactoryOutput {
        /// Position of the entry in the source list
        index: usize,
    },

    /// The error filter specification had an unsupported type.
    #[error("Error filter must be a function or a pattern, but it was {found}")]
    InvalidFilter {
        /// Type name of the value received
        found: String,
    },

    /// Pass-through stream options could not be interpreted.
    #[error("Invalid stream options: {context}")]
    InvalidOptions {
        /// Description of the malformed option
        context: String,
    },
}

impl FallbackError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap an error raised by a source
    pub fn source_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Arc::new(error))
    }

    /// Create an invalid filter error naming the type that was received
    pub fn invalid_filter(found: impl Into<String>) -> Self {
        Self::InvalidFilter {
            found: found.into(),
        }
    }

    /// Create an invalid options error with the given context
    pub fn invalid_options(context: impl Into<String>) -> Self {
        Self::InvalidOptions {
            context: context.into(),
        }
    }

    /// Check if this error stems from how the fallback stream was configured
    ///
    /// Configuration errors are never subject to error filtering.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidSource { .. }
                | Self::InvalidFactoryOutput { .. }
                | Self::InvalidFilter { .. }
                | Self::InvalidOptions { .. }
        )
    }

    /// Returns `true` if both values wrap the very same source error object.
    ///
    /// Clones of a [`FallbackError::Source`] share their inner error, so a clone is
    /// the same error as its original. Other variants are compared structurally
    /// through their `Display` output.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Source(a), Self::Source(b)) => Arc::ptr_eq(a, b),
            (Self::Source(_), _) | (_, Self::Source(_)) => false,
            (a, b) => a.to_string() == b.to_string(),
        }
    }
}

/// Specialized Result type for fallback stream operations
pub type Result<T> = std::result::Result<T, FallbackError>;

/// Extension trait for converting errors into `FallbackError`
///
/// Implemented for all types that implement `std::error::Error + Send + Sync + 'static`,
/// so a source can turn its native failure into a stream error with `.into_fallback()`.
pub trait IntoFallbackError {
    /// Convert this error into a [`FallbackError::Source`]
    fn into_fallback(self) -> FallbackError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoFallbackError for E {
    fn into_fallback(self) -> FallbackError {
        FallbackError::source_error(self)
    }
}

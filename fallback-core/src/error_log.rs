// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::FallbackError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered, append-only log of errors that were converted into fallback transitions.
///
/// The log is a shared handle: the fallback stream writes to it while it is being
/// consumed, and any clone taken by the caller observes the same entries, before,
/// during and after consumption. Entries are never removed.
///
/// # Examples
///
/// ```
/// use fallback_core::{FallbackError, SuppressedErrors};
///
/// let log = SuppressedErrors::new();
/// let reader = log.clone();
///
/// log.append(FallbackError::stream_error("primary unavailable"));
///
/// assert_eq!(reader.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SuppressedErrors {
    entries: Arc<Mutex<Vec<FallbackError>>>,
}

impl SuppressedErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a suppressed error at the end of the log.
    pub fn append(&self, error: FallbackError) {
        self.entries.lock().push(error);
    }

    /// Returns a copy of the entries recorded so far, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FallbackError> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<FallbackError> {
        self.entries.lock().first().cloned()
    }

    #[must_use]
    pub fn last(&self) -> Option<FallbackError> {
        self.entries.lock().last().cloned()
    }
}

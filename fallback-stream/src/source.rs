// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error_listeners::ErrorListeners;
use fallback_concat::PinnedStream;
use fallback_core::{FallbackError, Result, StreamItem};
use futures::Stream;
use std::fmt;

type SourceFactory<T> = Box<dyn FnOnce() -> Option<PinnedStream<T>> + Send>;

pub(crate) enum SourceEntry<T> {
    Ready(PinnedStream<T>),
    Factory(SourceFactory<T>),
    Vacant,
}

impl<T> SourceEntry<T> {
    /// Resolves the entry to a stream. Factories are invoked here, exactly once.
    pub(crate) fn materialize(self, index: usize) -> Result<PinnedStream<T>> {
        match self {
            Self::Ready(stream) => Ok(stream),
            Self::Factory(factory) => {
                factory().ok_or(FallbackError::InvalidFactoryOutput { index })
            }
            Self::Vacant => Err(FallbackError::InvalidSource { index }),
        }
    }
}

/// One entry of the ordered source list.
///
/// A source is either a stream that already exists or a factory invoked the first
/// time the combined stream reaches this position. Sources behind a healthy one are
/// never materialized.
///
/// # Examples
///
/// ```rust
/// use fallback_core::StreamItem;
/// use fallback_stream::Source;
/// use futures::stream;
///
/// let primary = Source::lazy(|| stream::iter(vec![StreamItem::Value(1)]));
/// let backup = Source::ready(stream::iter(vec![StreamItem::Value(2)]));
///
/// assert!(primary.is_factory());
/// assert!(!backup.is_factory());
/// ```
pub struct Source<T> {
    entry: SourceEntry<T>,
    listeners: ErrorListeners,
}

impl<T> Source<T> {
    fn from_entry(entry: SourceEntry<T>) -> Self {
        Self {
            entry,
            listeners: ErrorListeners::new(),
        }
    }

    /// A stream that already exists.
    pub fn ready<S>(stream: S) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        Self::from_entry(SourceEntry::Ready(Box::pin(stream)))
    }

    /// A factory invoked with no arguments when this source is reached.
    pub fn lazy<F, S>(factory: F) -> Self
    where
        F: FnOnce() -> S + Send + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        Self::from_entry(SourceEntry::Factory(Box::new(move || {
            Some(Box::pin(factory()) as PinnedStream<T>)
        })))
    }

    /// A factory that may fail to produce a stream.
    ///
    /// Returning `None` ends the combined stream with
    /// [`FallbackError::InvalidFactoryOutput`].
    pub fn try_lazy<F, S>(factory: F) -> Self
    where
        F: FnOnce() -> Option<S> + Send + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        Self::from_entry(SourceEntry::Factory(Box::new(move || {
            factory().map(|stream| Box::pin(stream) as PinnedStream<T>)
        })))
    }

    /// A stream that may be missing.
    ///
    /// A missing stream ends the combined stream with [`FallbackError::InvalidSource`]
    /// when it is reached.
    pub fn from_option<S>(stream: Option<S>) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        stream.map_or_else(|| Self::from_entry(SourceEntry::Vacant), Self::ready)
    }

    /// Attaches an error listener and returns the source.
    ///
    /// The listener is called with the source's error only if that error ends up
    /// propagating to the consumer. See [`ErrorListeners`].
    #[must_use]
    pub fn on_error<F>(self, listener: F) -> Self
    where
        F: FnMut(&FallbackError) + Send + 'static,
    {
        self.listeners.attach(listener);
        self
    }

    /// A handle for attaching listeners after the source has been handed over.
    #[must_use]
    pub fn listeners(&self) -> ErrorListeners {
        self.listeners.clone()
    }

    #[must_use]
    pub const fn is_factory(&self) -> bool {
        matches!(self.entry, SourceEntry::Factory(_))
    }

    pub(crate) fn into_parts(self) -> (SourceEntry<T>, ErrorListeners) {
        (self.entry, self.listeners)
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.entry {
            SourceEntry::Ready(_) => "Ready",
            SourceEntry::Factory(_) => "Factory",
            SourceEntry::Vacant => "Vacant",
        };
        f.debug_struct("Source")
            .field("kind", &kind)
            .field("listeners", &self.listeners)
            .finish()
    }
}

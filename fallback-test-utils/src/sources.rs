// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Canned source streams for fallback scenarios.

use fallback_core::{FallbackError, StreamItem};
use futures::stream::{self, FusedStream, StreamExt};
use futures::{FutureExt, Stream};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// A plain error type standing in for whatever a real source would fail with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TestError {
    pub message: String,
}

/// A source error wrapping a fresh [`TestError`].
pub fn test_error(message: &str) -> FallbackError {
    FallbackError::source_error(TestError {
        message: message.to_string(),
    })
}

/// A source yielding `items` and then ending.
pub fn values<T>(items: Vec<T>) -> impl Stream<Item = StreamItem<T>> + Send + Unpin
where
    T: Send + 'static,
{
    stream::iter(items.into_iter().map(StreamItem::Value))
}

/// A source yielding `items` and then failing with `error`.
pub fn failing_source<T>(
    items: Vec<T>,
    error: FallbackError,
) -> impl Stream<Item = StreamItem<T>> + Send + Unpin
where
    T: Send + 'static,
{
    stream::iter(
        items
            .into_iter()
            .map(StreamItem::Value)
            .chain(std::iter::once(StreamItem::Error(error))),
    )
}

/// A source that has already been consumed to its end.
pub fn ended_stream<T>(items: Vec<T>) -> impl Stream<Item = StreamItem<T>> + FusedStream + Send + Unpin
where
    T: Send + 'static,
{
    let mut stream = values(items).fuse();
    while let Some(Some(_)) = stream.next().now_or_never() {}
    stream
}

/// A source that stays pending for one poll, then fails with `error`.
pub fn deferred_error<T>(error: FallbackError) -> DeferredError<T> {
    DeferredError {
        error: Some(error),
        yielded_pending: false,
        _item: PhantomData,
    }
}

pub struct DeferredError<T> {
    error: Option<FallbackError>,
    yielded_pending: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T> Stream for DeferredError<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if !self.yielded_pending {
            self.yielded_pending = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        Poll::Ready(self.error.take().map(StreamItem::Error))
    }
}

/// Counts how many times factories wrapped with [`InvocationCounter::track`] were invoked.
#[derive(Clone, Debug, Default)]
pub struct InvocationCounter {
    count: Arc<AtomicUsize>,
}

impl InvocationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Wraps `factory` so that each invocation is counted.
    pub fn track<F, S>(&self, factory: F) -> impl FnOnce() -> S + Send + 'static
    where
        F: FnOnce() -> S + Send + 'static,
    {
        let count = Arc::clone(&self.count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            factory()
        }
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A source that fails part-way through a plain stream of values.

use fallback_core::{FallbackError, StreamItem};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Wraps a stream of plain values and emits `error` as the item at position `at`.
///
/// The inner stream is not consumed when the error is emitted, so a consumer that keeps
/// polling sees the remaining values afterwards. A fallback guard must never do that.
///
/// ```rust
/// use fallback_core::{FallbackError, StreamItem};
/// use fallback_test_utils::ErrorInjectingStream;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let mut source = ErrorInjectingStream::new(
///     stream::iter(vec!["a", "b"]),
///     1,
///     FallbackError::stream_error("connection reset"),
/// );
///
/// assert!(matches!(source.next().await, Some(StreamItem::Value("a"))));
/// assert!(matches!(source.next().await, Some(StreamItem::Error(_))));
/// assert!(matches!(source.next().await, Some(StreamItem::Value("b"))));
/// # }
/// ```
pub struct ErrorInjectingStream<S> {
    inner: S,
    pending: Option<(usize, FallbackError)>,
    position: usize,
}

impl<S> ErrorInjectingStream<S> {
    pub fn new(inner: S, at: usize, error: FallbackError) -> Self {
        Self {
            inner,
            pending: Some((at, error)),
            position: 0,
        }
    }

    fn take_due_error(&mut self) -> Option<FallbackError> {
        match self.pending.take() {
            Some((at, error)) if at == self.position => Some(error),
            other => {
                self.pending = other;
                None
            }
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        let item = match this.take_due_error() {
            Some(error) => StreamItem::Error(error),
            None => match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(value)) => StreamItem::Value(value),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            },
        };

        this.position += 1;
        Poll::Ready(Some(item))
    }
}

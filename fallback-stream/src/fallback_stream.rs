// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error_listeners::ListenerLease;
use crate::guard::{FallbackGuard, GuardContext};
use crate::options::FallbackOptions;
use crate::source::Source;
use fallback_concat::{Concat, ConcatOptions, ConcatQueue, PinnedStream, Producer};
use fallback_core::{FallbackError, Result, StreamItem, SuppressedErrors};
use futures::stream::FusedStream;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Concatenates `sources` in order, falling back to the next source when one fails.
///
/// - The first source is consumed. If it ends cleanly, the combined stream ends and
///   no other source is touched.
/// - If it fails with an error accepted by the options' error filter, the error is
///   recorded in the suppressed-error log and the next source takes over.
/// - If it fails with any other error, that error ends the combined stream.
/// - The last source is never guarded: its errors always reach the consumer.
///
/// Values emitted by a source before it fails have already been forwarded.
///
/// # Examples
///
/// ```rust
/// use fallback_core::{FallbackError, StreamItem};
/// use fallback_stream::{fallback_stream, FallbackOptions, Source};
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let primary = Source::ready(stream::iter(vec![StreamItem::<i32>::Error(
///     FallbackError::stream_error("primary unavailable"),
/// )]));
/// let mirror = Source::lazy(|| stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]));
///
/// let combined = fallback_stream(vec![primary, mirror], FallbackOptions::new());
/// let log = combined.error_log();
///
/// let values: Vec<i32> = combined.filter_map(|item| async move { item.ok() }).collect().await;
/// assert_eq!(values, vec![1, 2]);
/// assert_eq!(log.len(), 1);
/// # }
/// ```
pub fn fallback_stream<T, I>(sources: I, options: FallbackOptions) -> FallbackStream<T>
where
    I: IntoIterator<Item = Source<T>>,
    T: Send + 'static,
{
    let (filter, concat_options) = options.into_parts();
    let errors = SuppressedErrors::new();
    let queue = ConcatQueue::new();
    let context = GuardContext::new(
        filter,
        errors.clone(),
        queue.downgrade(),
        concat_options.label(),
    );

    let sources: Vec<Source<T>> = sources.into_iter().collect();
    let last = sources.len().saturating_sub(1);
    for (index, source) in sources.into_iter().enumerate() {
        queue.push_back(producer(source, index, index == last, context.clone()));
    }

    FallbackStream {
        inner: Concat::new(queue, concat_options),
        errors,
    }
}

/// Like [`fallback_stream`], with options read from a JSON value.
///
/// # Errors
///
/// Fails before any source is touched if the options are invalid.
/// See [`FallbackOptions::from_value`].
pub fn fallback_stream_from_value<T, I>(sources: I, options: &Value) -> Result<FallbackStream<T>>
where
    I: IntoIterator<Item = Source<T>>,
    T: Send + 'static,
{
    let options = FallbackOptions::from_value(options)?;
    Ok(fallback_stream(sources, options))
}

fn producer<T>(
    source: Source<T>,
    index: usize,
    terminal: bool,
    context: GuardContext<T>,
) -> Producer<T>
where
    T: Send + 'static,
{
    let (entry, listeners) = source.into_parts();
    // Dropped with the producer if this source is never reached
    let lease = ListenerLease::new(listeners);

    Box::new(move || {
        let stream = match entry.materialize(index) {
            Ok(stream) => stream,
            Err(error) => {
                warn!("fallback stream: cannot start source {}: {}", index, error);
                return Err(error);
            }
        };

        if terminal {
            // Nothing to fall back to: listeners see the error as it passes through
            let observed = stream.inspect(move |item| {
                if let Some(error) = item.as_error() {
                    lease.release(error);
                }
            });
            return Ok(Box::pin(observed) as PinnedStream<T>);
        }

        Ok(Box::pin(FallbackGuard::with_lease(stream, index, lease, context)) as PinnedStream<T>)
    })
}

/// The combined stream returned by [`fallback_stream`].
///
/// Besides the items themselves, it exposes the log of errors that were suppressed
/// to trigger a fallback. [`error_log`](Self::error_log) returns a handle that stays
/// readable after the stream has been consumed or dropped.
#[pin_project]
pub struct FallbackStream<T> {
    #[pin]
    inner: Concat<T>,
    errors: SuppressedErrors,
}

impl<T> FallbackStream<T>
where
    T: Send + 'static,
{
    /// Concatenates `sources` with default options: every error triggers fallback.
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Source<T>>,
    {
        fallback_stream(sources, FallbackOptions::default())
    }
}

impl<T> FallbackStream<T> {
    /// The errors suppressed so far, in the order their sources failed.
    #[must_use]
    pub fn errors(&self) -> Vec<FallbackError> {
        self.errors.snapshot()
    }

    #[must_use]
    pub fn error_log(&self) -> SuppressedErrors {
        self.errors.clone()
    }

    /// The stream options forwarded to the concatenation driver.
    #[must_use]
    pub fn options(&self) -> &ConcatOptions {
        self.inner.options()
    }

    /// Number of sources not yet reached. Drops to zero once a source ends cleanly.
    #[must_use]
    pub fn pending_sources(&self) -> usize {
        self.inner.queue().len()
    }
}

impl<T> Stream for FallbackStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

impl<T> FusedStream for FallbackStream<T> {
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

/// Extension trait turning a list of sources into a [`FallbackStream`].
pub trait FallbackExt<T> {
    /// Concatenates the sources with fallback. See [`fallback_stream`].
    fn into_fallback_stream(self, options: FallbackOptions) -> FallbackStream<T>;
}

impl<T> FallbackExt<T> for Vec<Source<T>>
where
    T: Send + 'static,
{
    fn into_fallback_stream(self, options: FallbackOptions) -> FallbackStream<T> {
        fallback_stream(self, options)
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error_listeners::{ErrorListeners, ListenerLease};
use fallback_concat::WeakConcatQueue;
use fallback_core::{ErrorFilter, StreamItem, SuppressedErrors};
use futures::stream::FusedStream;
use futures::{ready, Stream};
use pin_project::pin_project;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Lifecycle of a guarded source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// The source is active and no error has been seen yet.
    Armed,
    /// The first error matched the filter; it was logged and the source was ended.
    FallbackTriggered,
    /// The first error did not match the filter and was forwarded.
    Propagated,
    /// The source ended on its own; the remaining sources were discarded.
    NaturalEnd,
}

/// State shared by every guard of one fallback stream.
pub struct GuardContext<T> {
    filter: ErrorFilter,
    errors: SuppressedErrors,
    queue: WeakConcatQueue<T>,
    label: Option<Arc<str>>,
}

impl<T> GuardContext<T> {
    #[must_use]
    pub fn new(
        filter: ErrorFilter,
        errors: SuppressedErrors,
        queue: WeakConcatQueue<T>,
        label: Option<&str>,
    ) -> Self {
        Self {
            filter,
            errors,
            queue,
            label: label.map(Arc::from),
        }
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }
}

impl<T> Clone for GuardContext<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            errors: self.errors.clone(),
            queue: self.queue.clone(),
            label: self.label.clone(),
        }
    }
}

/// Interception wrapper around every source except the last one.
///
/// Values pass through untouched. The first error decides the source's fate:
///
/// - If the filter matches, the error is appended to the suppressed-error log, held
///   listeners are dropped, and the guard reports end-of-stream so the driver moves on
///   to the next source.
/// - Otherwise the held listeners receive the error and the guard forwards it, failing
///   the combined stream.
///
/// If the source ends without error, the driver's remaining sources are discarded:
/// a healthy source is the last one consumed.
#[pin_project]
pub struct FallbackGuard<S, T> {
    #[pin]
    inner: S,
    state: GuardState,
    index: usize,
    listeners: ListenerLease,
    context: GuardContext<T>,
}

impl<S, T> FallbackGuard<S, T>
where
    S: Stream<Item = StreamItem<T>>,
{
    /// Guards `inner`. Dropping the guard before a decision detaches `listeners`.
    pub fn new(inner: S, index: usize, listeners: ErrorListeners, context: GuardContext<T>) -> Self {
        Self::with_lease(inner, index, ListenerLease::new(listeners), context)
    }

    pub(crate) fn with_lease(
        inner: S,
        index: usize,
        listeners: ListenerLease,
        context: GuardContext<T>,
    ) -> Self {
        Self {
            inner,
            state: GuardState::Armed,
            index,
            listeners,
            context,
        }
    }

    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }
}

impl<S, T> Stream for FallbackGuard<S, T>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.state != GuardState::Armed {
            return Poll::Ready(None);
        }

        match ready!(this.inner.poll_next(cx)) {
            Some(StreamItem::Value(value)) => Poll::Ready(Some(StreamItem::Value(value))),
            Some(StreamItem::Error(error)) => {
                if this.context.filter.matches(&error) {
                    *this.state = GuardState::FallbackTriggered;
                    debug!(
                        "fallback stream '{}': source {} failed, falling back: {}",
                        this.context.label(),
                        this.index,
                        error
                    );
                    this.listeners.detach_all();
                    this.context.errors.append(error);
                    Poll::Ready(None)
                } else {
                    *this.state = GuardState::Propagated;
                    debug!(
                        "fallback stream '{}': source {} failed with a non-matching error: {}",
                        this.context.label(),
                        this.index,
                        error
                    );
                    this.listeners.release(&error);
                    Poll::Ready(Some(StreamItem::Error(error)))
                }
            }
            None => {
                *this.state = GuardState::NaturalEnd;
                this.listeners.detach_all();
                let discarded = this.context.queue.clear();
                debug!(
                    "fallback stream '{}': source {} ended, discarding {} remaining source(s)",
                    this.context.label(),
                    this.index,
                    discarded
                );
                Poll::Ready(None)
            }
        }
    }
}

impl<S, T> FusedStream for FallbackGuard<S, T>
where
    S: Stream<Item = StreamItem<T>>,
{
    fn is_terminated(&self) -> bool {
        self.state != GuardState::Armed
    }
}

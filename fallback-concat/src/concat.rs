// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::options::ConcatOptions;
use crate::queue::{ConcatQueue, PinnedStream, Producer};
use fallback_core::StreamItem;
use futures::stream::FusedStream;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Sequential concatenation of lazily produced streams.
///
/// Pulls the first producer's stream until it ends, then invokes the next producer,
/// and so on. Values are forwarded unchanged. The first error item, or a producer
/// failing to produce a stream, is forwarded and terminates the whole sequence.
pub struct Concat<T> {
    queue: ConcatQueue<T>,
    current: Option<PinnedStream<T>>,
    options: ConcatOptions,
    terminated: bool,
}

impl<T> Concat<T> {
    /// Drives the producers held by `queue`.
    ///
    /// The queue stays shared with every other clone of it: producers removed or
    /// cleared elsewhere are never invoked.
    #[must_use]
    pub fn new(queue: ConcatQueue<T>, options: ConcatOptions) -> Self {
        Self {
            queue,
            current: None,
            options,
            terminated: false,
        }
    }

    #[must_use]
    pub fn from_producers<I>(producers: I) -> Self
    where
        I: IntoIterator<Item = Producer<T>>,
    {
        Self::new(producers.into_iter().collect(), ConcatOptions::default())
    }

    #[must_use]
    pub fn options(&self) -> &ConcatOptions {
        &self.options
    }

    #[must_use]
    pub fn queue(&self) -> &ConcatQueue<T> {
        &self.queue
    }

    fn terminate(&mut self) {
        self.current = None;
        self.queue.clear();
        self.terminated = true;
    }
}

impl<T> Stream for Concat<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = Pin::into_inner(self);

        loop {
            if this.terminated {
                return Poll::Ready(None);
            }

            if this.current.is_none() {
                match this.queue.pop_front() {
                    Some(producer) => match producer() {
                        Ok(stream) => this.current = Some(stream),
                        Err(error) => {
                            this.terminate();
                            return Poll::Ready(Some(StreamItem::Error(error)));
                        }
                    },
                    None => {
                        this.terminated = true;
                        return Poll::Ready(None);
                    }
                }
            }

            let Some(stream) = this.current.as_mut() else {
                continue;
            };

            match stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(StreamItem::Value(value))) => {
                    return Poll::Ready(Some(StreamItem::Value(value)));
                }
                Poll::Ready(Some(StreamItem::Error(error))) => {
                    this.terminate();
                    return Poll::Ready(Some(StreamItem::Error(error)));
                }
                Poll::Ready(None) => {
                    // Current source exhausted, move on to the next producer
                    this.current = None;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> FusedStream for Concat<T> {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Extension trait for concatenating a vector of ready streams in order.
pub trait ConcatExt {
    type Item;

    /// Concatenates the streams, consuming each one fully before starting the next.
    fn concat_streams(self) -> Concat<Self::Item>;
}

impl<T, S> ConcatExt for Vec<S>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: 'static,
{
    type Item = T;

    fn concat_streams(self) -> Concat<Self::Item> {
        Concat::from_producers(self.into_iter().map(|stream| {
            Box::new(move || Ok(Box::pin(stream) as PinnedStream<T>)) as Producer<T>
        }))
    }
}

// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_core::{Result, StreamItem};
use futures::Stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Weak};

/// A boxed source stream as consumed by [`Concat`](crate::Concat).
pub type PinnedStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send>>;

/// A zero-argument producer, invoked once when the driver reaches it.
///
/// Returning `Err` aborts the concatenation with that error.
pub type Producer<T> = Box<dyn FnOnce() -> Result<PinnedStream<T>> + Send>;

/// The shared FIFO of producers still waiting to be consumed.
///
/// Clones refer to the same queue, so a producer's stream can hold a handle and
/// clear the remaining producers while the driver is polling it.
pub struct ConcatQueue<T> {
    producers: Arc<Mutex<VecDeque<Producer<T>>>>,
}

impl<T> ConcatQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            producers: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn push_back(&self, producer: Producer<T>) {
        self.producers.lock().push_back(producer);
    }

    /// Removes the next producer. The lock is released before the caller invokes it.
    pub fn pop_front(&self) -> Option<Producer<T>> {
        self.producers.lock().pop_front()
    }

    /// Drops every pending producer without invoking it, returning how many were dropped.
    pub fn clear(&self) -> usize {
        // Producers are dropped after the lock is released
        let drained: Vec<Producer<T>> = self.producers.lock().drain(..).collect();
        drained.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.producers.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.producers.lock().is_empty()
    }

    /// A non-owning handle, for producers that need to reach back into their own queue.
    #[must_use]
    pub fn downgrade(&self) -> WeakConcatQueue<T> {
        WeakConcatQueue {
            producers: Arc::downgrade(&self.producers),
        }
    }
}

/// A [`ConcatQueue`] handle that does not keep the queue alive.
pub struct WeakConcatQueue<T> {
    producers: Weak<Mutex<VecDeque<Producer<T>>>>,
}

impl<T> WeakConcatQueue<T> {
    /// Clears the queue if it still exists, returning how many producers were dropped.
    pub fn clear(&self) -> usize {
        self.producers.upgrade().map_or(0, |producers| {
            let drained: Vec<Producer<T>> = producers.lock().drain(..).collect();
            drained.len()
        })
    }
}

impl<T> Clone for WeakConcatQueue<T> {
    fn clone(&self) -> Self {
        Self {
            producers: Weak::clone(&self.producers),
        }
    }
}

impl<T> Clone for ConcatQueue<T> {
    fn clone(&self) -> Self {
        Self {
            producers: Arc::clone(&self.producers),
        }
    }
}

impl<T> Default for ConcatQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Producer<T>> for ConcatQueue<T> {
    fn from_iter<I: IntoIterator<Item = Producer<T>>>(iter: I) -> Self {
        Self {
            producers: Arc::new(Mutex::new(iter.into_iter().collect())),
        }
    }
}

impl<T> fmt::Debug for ConcatQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatQueue")
            .field("pending", &self.len())
            .finish()
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_core::FallbackError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Listener = Box<dyn FnMut(&FallbackError) + Send>;

#[derive(Default)]
struct Registry {
    pending: Vec<Listener>,
    closed: bool,
}

/// Error observers attached to one source.
///
/// Listeners are recorded but not invoked until the fallback decision for the source
/// is known. If the source's error is propagated, every recorded listener receives it.
/// If the error is suppressed, or the source ends cleanly, the listeners are dropped
/// without being called. A source that is never reached, because an earlier source
/// ended cleanly or failed, or because the combined stream was dropped, has its
/// listeners dropped as well. Once a decision has been made the registry is closed and
/// later attachments are ignored.
///
/// Listeners never observe a suppressed error, not even when attached explicitly.
/// Suppressed errors are read from the combined stream's error log instead.
///
/// The handle is cheap to clone, so a caller can keep one after handing the source
/// over and still attach listeners while the combined stream is being consumed.
#[derive(Clone, Default)]
pub struct ErrorListeners {
    registry: Arc<Mutex<Registry>>,
}

impl ErrorListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `listener`. Returns `false` if the source has already been decided.
    pub fn attach<F>(&self, listener: F) -> bool
    where
        F: FnMut(&FallbackError) + Send + 'static,
    {
        let mut registry = self.registry.lock();
        if registry.closed {
            return false;
        }
        registry.pending.push(Box::new(listener));
        true
    }

    /// Number of listeners waiting for a decision.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.registry.lock().closed
    }

    /// Closes the registry and delivers `error` to every recorded listener, in
    /// attachment order. Returns how many listeners were called.
    pub(crate) fn release(&self, error: &FallbackError) -> usize {
        let mut listeners = self.close();
        for listener in &mut listeners {
            listener(error);
        }
        listeners.len()
    }

    /// Closes the registry and drops every recorded listener without calling it.
    pub(crate) fn detach_all(&self) -> usize {
        self.close().len()
    }

    // Listeners run outside the lock so they may attach to or inspect this registry
    fn close(&self) -> Vec<Listener> {
        let mut registry = self.registry.lock();
        registry.closed = true;
        std::mem::take(&mut registry.pending)
    }
}

/// Owns the decision for one source's registry.
///
/// Whatever holds the lease (a pending producer, a guard, the last source's stream)
/// either releases or detaches the listeners. Dropping the lease undecided detaches them.
pub(crate) struct ListenerLease {
    listeners: ErrorListeners,
}

impl ListenerLease {
    pub(crate) fn new(listeners: ErrorListeners) -> Self {
        Self { listeners }
    }

    pub(crate) fn release(&self, error: &FallbackError) -> usize {
        self.listeners.release(error)
    }

    pub(crate) fn detach_all(&self) -> usize {
        self.listeners.detach_all()
    }
}

impl Drop for ListenerLease {
    fn drop(&mut self) {
        self.listeners.detach_all();
    }
}

impl fmt::Debug for ErrorListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("ErrorListeners")
            .field("pending", &registry.pending.len())
            .field("closed", &registry.closed)
            .finish()
    }
}

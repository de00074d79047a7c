// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_concat::{ConcatQueue, PinnedStream, Producer};
use fallback_core::{ErrorFilter, FallbackError, StreamItem, SuppressedErrors};
use fallback_stream::{ErrorListeners, FallbackGuard, GuardContext, GuardState};
use fallback_test_utils::{
    assert_stream_ended, failing_source, test_channel_with_errors, test_error, unwrap_error,
    unwrap_stream, unwrap_value, values,
};
use futures::stream::FusedStream;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;

fn queue_with_pending(count: usize) -> ConcatQueue<i32> {
    (0..count)
        .map(|_| Box::new(|| Ok(Box::pin(values(vec![0])) as PinnedStream<i32>)) as Producer<i32>)
        .collect()
}

fn context(filter: ErrorFilter, errors: &SuppressedErrors, queue: &ConcatQueue<i32>) -> GuardContext<i32> {
    GuardContext::new(filter, errors.clone(), queue.downgrade(), Some("guard-tests"))
}

#[tokio::test]
async fn test_guard_passes_values_through() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(1);
    let (tx, source) = test_channel_with_errors::<i32>();
    let mut guard = FallbackGuard::new(
        source,
        0,
        ErrorListeners::new(),
        context(ErrorFilter::always(), &errors, &queue),
    );

    // Act & Assert
    tx.unbounded_send(StreamItem::Value(1))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut guard, 100).await)), 1);
    tx.unbounded_send(StreamItem::Value(2))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut guard, 100).await)), 2);
    assert_eq!(guard.state(), GuardState::Armed);
    assert!(!guard.is_terminated());
    assert_eq!(queue.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_guard_matching_error_triggers_fallback() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(2);
    let failure = test_error("timed out");
    let mut guard = FallbackGuard::new(
        failing_source(vec![1], failure.clone()),
        0,
        ErrorListeners::new(),
        context(ErrorFilter::from_pattern("timed out"), &errors, &queue),
    );

    // Act
    let first = guard.next().await;
    let second = guard.next().await;

    // Assert
    assert_eq!(unwrap_value(first), 1);
    assert!(second.is_none());
    assert_eq!(guard.state(), GuardState::FallbackTriggered);
    assert!(guard.is_terminated());
    assert!(errors.first().is_some_and(|e| e.is_same(&failure)));
    assert_eq!(queue.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_guard_non_matching_error_is_propagated() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(1);
    let failure = test_error("access denied");
    let mut guard = FallbackGuard::new(
        failing_source(Vec::new(), failure.clone()),
        0,
        ErrorListeners::new(),
        context(ErrorFilter::from_pattern("timed out"), &errors, &queue),
    );

    // Act
    let error = unwrap_error(guard.next().await);

    // Assert
    assert!(error.is_same(&failure));
    assert_eq!(guard.state(), GuardState::Propagated);
    assert_stream_ended(&mut guard, 100).await;
    assert!(errors.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_guard_natural_end_discards_remaining_sources() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(3);
    let mut guard = FallbackGuard::new(
        values(vec![1]),
        0,
        ErrorListeners::new(),
        context(ErrorFilter::always(), &errors, &queue),
    );

    // Act
    let first = guard.next().await;
    let end = guard.next().await;

    // Assert
    assert_eq!(unwrap_value(first), 1);
    assert!(end.is_none());
    assert_eq!(guard.state(), GuardState::NaturalEnd);
    assert!(queue.is_empty());
    assert!(errors.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_guard_ignores_source_after_decision() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(1);
    let (tx, source) = test_channel_with_errors::<i32>();
    let mut guard = FallbackGuard::new(
        source,
        0,
        ErrorListeners::new(),
        context(ErrorFilter::always(), &errors, &queue),
    );

    // Act
    tx.unbounded_send(StreamItem::Error(test_error("first")))?;
    tx.unbounded_send(StreamItem::Value(2))?;
    tx.unbounded_send(StreamItem::Error(test_error("second")))?;

    // Assert
    assert_stream_ended(&mut guard, 100).await;
    assert_stream_ended(&mut guard, 100).await;
    assert_eq!(errors.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_guard_releases_listeners_on_propagation() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(1);
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let listeners = ErrorListeners::new();
    for tag in ["a", "b"] {
        let seen = Arc::clone(&seen);
        listeners.attach(move |error: &FallbackError| seen.lock().push(format!("{tag}:{error}")));
    }
    let mut guard = FallbackGuard::new(
        failing_source(Vec::new(), test_error("refused")),
        0,
        listeners.clone(),
        context(ErrorFilter::from_fn(|_| false), &errors, &queue),
    );

    // Act
    let _ = guard.next().await;

    // Assert
    assert_eq!(*seen.lock(), vec!["a:refused".to_string(), "b:refused".to_string()]);
    assert!(listeners.is_closed());
    assert!(!listeners.attach(|_| {}));

    Ok(())
}

#[tokio::test]
async fn test_guard_drops_listeners_on_fallback() -> anyhow::Result<()> {
    // Arrange
    let errors = SuppressedErrors::new();
    let queue = queue_with_pending(1);
    let calls = Arc::new(Mutex::new(0_usize));
    let listeners = ErrorListeners::new();
    let counter = Arc::clone(&calls);
    listeners.attach(move |_| *counter.lock() += 1);
    let mut guard = FallbackGuard::new(
        failing_source(Vec::<i32>::new(), test_error("timed out")),
        0,
        listeners.clone(),
        context(ErrorFilter::always(), &errors, &queue),
    );

    // Act
    let end = guard.next().await;

    // Assert
    assert!(end.is_none());
    assert_eq!(*calls.lock(), 0);
    assert!(listeners.is_closed());
    assert_eq!(Arc::strong_count(&calls), 1);

    Ok(())
}

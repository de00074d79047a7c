// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_core::{FallbackError, StreamItem};
use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits for the next item, panicking if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Stream ended, expected an item"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for an item"),
    }
}

pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(e)) => panic!("Expected a value but got error: {e}"),
        None => panic!("Expected a value but the stream ended"),
    }
}

pub fn unwrap_error<T>(item: Option<StreamItem<T>>) -> FallbackError {
    match item {
        Some(StreamItem::Error(e)) => e,
        Some(StreamItem::Value(_)) => panic!("Expected an error but got a value"),
        None => panic!("Expected an error but the stream ended"),
    }
}

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected item emitted, expected no output.");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected the stream to end, but it emitted an item"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for the stream to end"),
    }
}

/// Drains a finite stream, splitting values from the (at most one) terminal error.
pub async fn drain<S, T>(stream: S, timeout_ms: u64) -> (Vec<T>, Option<FallbackError>)
where
    S: Stream<Item = StreamItem<T>>,
{
    let items = timeout(Duration::from_millis(timeout_ms), stream.collect::<Vec<_>>())
        .await
        .unwrap_or_else(|_| panic!("Timed out after {timeout_ms}ms draining the stream"));

    let mut values = Vec::new();
    let mut error = None;
    for item in items {
        match item {
            StreamItem::Value(value) => values.push(value),
            StreamItem::Error(e) => {
                assert!(error.is_none(), "Stream emitted more than one error");
                error = Some(e);
            }
        }
    }
    (values, error)
}

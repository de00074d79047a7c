// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the fallback stream crates.
//!
//! This crate provides canned sources, channels and assertion helpers for testing
//! sequential fallback behaviour. It is designed for use in development and testing
//! only, not for production code.
//!
//! # Key Pieces
//!
//! - [`test_channel_with_errors`]: push values and errors into a source by hand
//! - [`sources`]: ready-made sources that succeed, fail, fail later or have already ended
//! - [`helpers`]: timeouts and assertions around `StreamItem` streams
//! - [`test_data`]: a structured [`Record`](test_data::Record) fixture
//!
//! # Examples
//!
//! ```rust
//! use fallback_core::StreamItem;
//! use fallback_test_utils::{test_channel_with_errors, test_error};
//! use futures::StreamExt;
//!
//! # async fn example() {
//! let (tx, mut stream) = test_channel_with_errors::<i32>();
//!
//! tx.unbounded_send(StreamItem::Value(1)).unwrap();
//! tx.unbounded_send(StreamItem::Error(test_error("primary down"))).unwrap();
//!
//! assert!(stream.next().await.unwrap().is_value());
//! assert!(stream.next().await.unwrap().is_error());
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error_injection;
pub mod helpers;
pub mod sources;
pub mod test_data;

use fallback_core::StreamItem;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};

pub use error_injection::ErrorInjectingStream;
pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, drain, unwrap_error, unwrap_stream,
    unwrap_value,
};
pub use sources::{
    deferred_error, ended_stream, failing_source, test_error, values, InvocationCounter,
    TestError,
};

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded();
    (tx, rx.map(StreamItem::Value))
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// Tests send values and errors explicitly, in any order.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    mpsc::unbounded()
}

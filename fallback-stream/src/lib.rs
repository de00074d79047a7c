// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sequential stream concatenation with automatic fallback.
//!
//! Given an ordered list of [`Source`]s, [`fallback_stream`] consumes the first one.
//! When a source fails with an error accepted by the [`ErrorFilter`], the error is
//! recorded and the next source takes over transparently. Any other error reaches
//! the consumer. A source that ends cleanly ends the combined stream.
//!
//! # Architecture
//!
//! - **[`Source`]**: a ready stream or a factory, materialized only when reached
//! - **[`FallbackGuard`]**: wraps every source but the last and decides, on the first
//!   error, between falling back and propagating
//! - **[`ErrorListeners`]**: per-source error observers, held until that decision
//! - **[`FallbackStream`]**: the combined stream plus its suppressed-error log
//! - **`fallback-concat`**: the sequential driver pulling the sources in order
//!
//! # Example: Primary With Mirror
//!
//! ```
//! use fallback_core::{FallbackError, StreamItem};
//! use fallback_stream::{fallback_stream, FallbackOptions, Source};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let primary = Source::ready(stream::iter(vec![
//!     StreamItem::Error(FallbackError::stream_error("connection timed out")),
//! ]));
//! let mirror = Source::lazy(|| stream::iter(vec![StreamItem::Value("from mirror")]));
//!
//! let options = FallbackOptions::new().with_pattern("timed out");
//! let mut combined = fallback_stream(vec![primary, mirror], options);
//!
//! let first = combined.next().await.unwrap().unwrap();
//! assert_eq!(first, "from mirror");
//! assert!(combined.next().await.is_none());
//! assert_eq!(combined.errors().len(), 1);
//! # }
//! ```
//!
//! # Example: Errors That Must Not Be Hidden
//!
//! ```
//! use fallback_core::{FallbackError, StreamItem};
//! use fallback_stream::{fallback_stream, FallbackOptions, Source};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let primary = Source::ready(stream::iter(vec![
//!     StreamItem::<i32>::Error(FallbackError::stream_error("permission denied")),
//! ]));
//! let mirror = Source::lazy(|| stream::iter(vec![StreamItem::Value(1)]));
//!
//! let options = FallbackOptions::new().with_pattern("timed out");
//! let mut combined = fallback_stream(vec![primary, mirror], options);
//!
//! assert!(combined.next().await.unwrap().is_error());
//! assert!(combined.next().await.is_none());
//! assert!(combined.errors().is_empty());
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod error_listeners;
mod fallback_stream;
pub mod guard;
pub mod options;
pub mod prelude;
pub mod source;

pub use error_listeners::ErrorListeners;
pub use fallback_core::{ErrorFilter, ErrorPattern, FallbackError, StreamItem, SuppressedErrors};
pub use fallback_stream::{fallback_stream, fallback_stream_from_value, FallbackExt, FallbackStream};
pub use guard::{FallbackGuard, GuardContext, GuardState};
pub use options::FallbackOptions;
pub use source::Source;

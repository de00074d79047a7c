// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting all commonly used traits and types.
//!
//! ```rust
//! use fallback_stream::prelude::*;
//! use futures::stream;
//!
//! let combined = vec![
//!     Source::ready(stream::iter(vec![StreamItem::Value(1)])),
//!     Source::ready(stream::iter(vec![StreamItem::Value(2)])),
//! ]
//! .into_fallback_stream(FallbackOptions::new().with_pattern("timed out"));
//!
//! assert!(combined.errors().is_empty());
//! ```

pub use crate::error_listeners::ErrorListeners;
pub use crate::fallback_stream::{fallback_stream, FallbackExt, FallbackStream};
pub use crate::options::FallbackOptions;
pub use crate::source::Source;
pub use fallback_core::{ErrorFilter, ErrorPattern, FallbackError, StreamItem, SuppressedErrors};

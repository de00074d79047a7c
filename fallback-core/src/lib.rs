// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types shared by the fallback stream crates.
//!
//! - [`StreamItem`]: a value or an error travelling through a stream
//! - [`FallbackError`]: the single error type for configuration and source failures
//! - [`ErrorFilter`] and [`ErrorPattern`]: the policy deciding which errors trigger fallback
//! - [`SuppressedErrors`]: the append-only log of errors converted into fallback transitions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod error;
pub mod error_filter;
pub mod error_log;
pub mod stream_item;

pub use self::error::{FallbackError, IntoFallbackError, Result};
pub use self::error_filter::{ErrorFilter, ErrorPattern};
pub use self::error_log::SuppressedErrors;
pub use self::stream_item::StreamItem;

// Copyright 2025 Umberto Gotti
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
mod concat;
mod options;
mod queue;

pub use concat::{Concat, ConcatExt};
pub use options::ConcatOptions;
pub use queue::{ConcatQueue, PinnedStream, Producer, WeakConcatQueue};

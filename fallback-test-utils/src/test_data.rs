// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// Where a fixture record was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Origin {
    Primary,
    Mirror,
    Cache,
}

/// A structured item, used to check that values travel through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Record {
    pub origin: Origin,
    pub id: u32,
    pub payload: String,
}

impl Record {
    #[must_use]
    pub fn new(origin: Origin, id: u32, payload: impl Into<String>) -> Self {
        Self {
            origin,
            id,
            payload: payload.into(),
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record[{:?}#{}={}]", self.origin, self.id, self.payload)
    }
}

pub fn primary(id: u32) -> Record {
    Record::new(Origin::Primary, id, format!("primary-{id}"))
}

pub fn mirror(id: u32) -> Record {
    Record::new(Origin::Mirror, id, format!("mirror-{id}"))
}

pub fn cache(id: u32) -> Record {
    Record::new(Origin::Cache, id, format!("cache-{id}"))
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Options accepted by [`fallback_stream`](crate::fallback_stream()).
//!
//! Options are built either with the typed builder or from a JSON value:
//!
//! ```rust
//! use fallback_stream::FallbackOptions;
//! use serde_json::json;
//!
//! let typed = FallbackOptions::new()
//!     .with_pattern(regex::Regex::new("timed out$").unwrap())
//!     .with_label("catalog");
//!
//! let dynamic = FallbackOptions::from_value(&json!({
//!     "errorFilter": { "pattern": "timed out$" },
//!     "label": "catalog",
//! }))
//! .unwrap();
//!
//! assert_eq!(typed.concat_options(), dynamic.concat_options());
//! ```

use fallback_concat::ConcatOptions;
use fallback_core::{ErrorFilter, ErrorPattern, FallbackError, Result};
use regex::Regex;
use serde_json::{Map, Value};

const ERROR_FILTER_KEYS: [&str; 2] = ["errorFilter", "error_filter"];
const PATTERN_KEY: &str = "pattern";

/// The error filter plus the stream options forwarded to the concatenation driver.
#[derive(Clone, Debug, Default)]
pub struct FallbackOptions {
    error_filter: Option<ErrorFilter>,
    concat: ConcatOptions,
}

impl FallbackOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_error_filter(mut self, filter: ErrorFilter) -> Self {
        self.error_filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_filter_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&FallbackError) -> bool + Send + Sync + 'static,
    {
        self.with_error_filter(ErrorFilter::from_fn(predicate))
    }

    #[must_use]
    pub fn with_pattern<P>(self, pattern: P) -> Self
    where
        P: ErrorPattern + Send + Sync + 'static,
    {
        self.with_error_filter(ErrorFilter::from_pattern(pattern))
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.concat = self.concat.with_label(label);
        self
    }

    #[must_use]
    pub fn with_concat_options(mut self, concat: ConcatOptions) -> Self {
        self.concat = concat;
        self
    }

    #[must_use]
    pub const fn has_error_filter(&self) -> bool {
        self.error_filter.is_some()
    }

    /// The effective filter: the configured one, or one suppressing every error.
    #[must_use]
    pub fn error_filter(&self) -> ErrorFilter {
        self.error_filter.clone().unwrap_or_default()
    }

    #[must_use]
    pub const fn concat_options(&self) -> &ConcatOptions {
        &self.concat
    }

    /// Builds options from a JSON value without modifying it.
    ///
    /// - `null` gives the defaults.
    /// - Any value that is not an object is taken as the filter specification itself.
    /// - In an object, `errorFilter` (or `error_filter`) is the filter specification and
    ///   every other key is forwarded to the concatenation driver.
    ///
    /// A filter specification is `null` (no filter) or `{"pattern": "<regex>"}`, tested
    /// against the error's text. A bare string is rejected like any other type.
    ///
    /// # Errors
    ///
    /// [`FallbackError::InvalidFilter`] naming the JSON type of an unsupported filter
    /// specification, or [`FallbackError::InvalidOptions`] if the pattern does not compile
    /// or the forwarded options are malformed.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Ok(Self {
                error_filter: filter_from_value(value)?,
                concat: ConcatOptions::default(),
            });
        };

        let mut error_filter = None;
        let mut forwarded = Map::new();
        for (key, entry) in map {
            if ERROR_FILTER_KEYS.contains(&key.as_str()) {
                if let Some(filter) = filter_from_value(entry)? {
                    error_filter = Some(filter);
                }
            } else {
                forwarded.insert(key.clone(), entry.clone());
            }
        }

        let concat = serde_json::from_value(Value::Object(forwarded))
            .map_err(|e| FallbackError::invalid_options(e.to_string()))?;

        Ok(Self {
            error_filter,
            concat,
        })
    }

    pub(crate) fn into_parts(self) -> (ErrorFilter, ConcatOptions) {
        (self.error_filter.unwrap_or_default(), self.concat)
    }
}

impl TryFrom<&Value> for FallbackOptions {
    type Error = FallbackError;

    fn try_from(value: &Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn filter_from_value(value: &Value) -> Result<Option<ErrorFilter>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(spec) if spec.len() == 1 => match spec.get(PATTERN_KEY) {
            Some(Value::String(source)) => {
                let pattern = Regex::new(source).map_err(|e| {
                    FallbackError::invalid_options(format!("error filter pattern: {e}"))
                })?;
                Ok(Some(ErrorFilter::from_pattern(pattern)))
            }
            _ => Err(FallbackError::invalid_filter(json_type_name(value))),
        },
        other => Err(FallbackError::invalid_filter(json_type_name(other))),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

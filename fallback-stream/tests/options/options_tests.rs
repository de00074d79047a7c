// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_concat::ConcatOptions;
use fallback_core::{ErrorFilter, FallbackError};
use fallback_stream::FallbackOptions;
use fallback_test_utils::test_error;
use serde_json::{json, Value};

fn invalid_filter_type(value: &Value) -> String {
    match FallbackOptions::from_value(value) {
        Err(FallbackError::InvalidFilter { found }) => found,
        other => panic!("Expected an invalid filter error, got {other:?}"),
    }
}

#[test]
fn test_defaults_suppress_every_error() {
    // Arrange & Act
    let options = FallbackOptions::new();

    // Assert
    assert!(!options.has_error_filter());
    assert!(options.error_filter().is_always());
    assert!(options.error_filter().matches(&test_error("anything")));
    assert_eq!(options.concat_options(), &ConcatOptions::default());
}

#[test]
fn test_null_options_are_defaults() -> anyhow::Result<()> {
    // Arrange
    let value = json!(null);

    // Act
    let options = FallbackOptions::from_value(&value)?;

    // Assert
    assert!(!options.has_error_filter());
    assert_eq!(options.concat_options(), &ConcatOptions::default());

    Ok(())
}

#[test]
fn test_bare_string_filter_is_rejected() {
    assert_eq!(invalid_filter_type(&json!("ECONNRESET")), "string");
    assert_eq!(invalid_filter_type(&json!({ "errorFilter": "ECONNRESET" })), "string");
}

#[test]
fn test_pattern_filter_is_a_regular_expression() -> anyhow::Result<()> {
    // Arrange
    let value = json!({ "errorFilter": { "pattern": "^(TypeError|RangeError):" } });

    // Act
    let options = FallbackOptions::from_value(&value)?;

    // Assert
    let filter = options.error_filter();
    assert!(options.has_error_filter());
    assert!(filter.matches(&test_error("TypeError: x is undefined")));
    assert!(filter.matches(&test_error("RangeError: overflow")));
    assert!(!filter.matches(&test_error("wrapped TypeError: x")));

    Ok(())
}

#[test]
fn test_pattern_that_does_not_compile_is_rejected() {
    // Arrange
    let value = json!({ "errorFilter": { "pattern": "(unclosed" } });

    // Act
    let result = FallbackOptions::from_value(&value);

    // Assert
    assert!(matches!(result, Err(FallbackError::InvalidOptions { .. })));
}

#[test]
fn test_filter_object_needs_a_single_pattern_string() {
    assert_eq!(invalid_filter_type(&json!({ "errorFilter": { "pattern": 3 } })), "object");
    assert_eq!(
        invalid_filter_type(&json!({ "errorFilter": { "pattern": "a", "flags": "i" } })),
        "object"
    );
}

#[test]
fn test_unsupported_filter_types_are_named() {
    assert_eq!(invalid_filter_type(&json!(5)), "number");
    assert_eq!(invalid_filter_type(&json!(true)), "boolean");
    assert_eq!(invalid_filter_type(&json!(["timeout"])), "array");
    assert_eq!(invalid_filter_type(&json!({ "errorFilter": 1.5 })), "number");
    assert_eq!(invalid_filter_type(&json!({ "errorFilter": {} })), "object");
    assert_eq!(invalid_filter_type(&json!({ "error_filter": false })), "boolean");
}

#[test]
fn test_invalid_filter_message() {
    // Arrange
    let value = json!({ "errorFilter": 5 });

    // Act
    let error = FallbackOptions::from_value(&value).err();

    // Assert
    assert_eq!(
        error.map(|e| e.to_string()),
        Some("Error filter must be a function or a pattern, but it was number".to_string())
    );
}

#[test]
fn test_object_options_split_filter_from_pass_through_keys() -> anyhow::Result<()> {
    // Arrange
    let value = json!({
        "errorFilter": { "pattern": "timed out" },
        "label": "catalog",
        "highWaterMark": 16,
        "objectMode": true,
    });
    let original = value.clone();

    // Act
    let options = FallbackOptions::from_value(&value)?;

    // Assert
    let concat = options.concat_options();
    assert!(options.has_error_filter());
    assert_eq!(concat.label(), Some("catalog"));
    assert_eq!(concat.get("highWaterMark"), Some(&json!(16)));
    assert_eq!(concat.get("objectMode"), Some(&json!(true)));
    assert_eq!(concat.get("errorFilter"), None);
    assert_eq!(value, original);

    Ok(())
}

#[test]
fn test_null_filter_key_means_no_filter() -> anyhow::Result<()> {
    // Arrange
    let value = json!({ "errorFilter": null, "label": "reports" });

    // Act
    let options = FallbackOptions::from_value(&value)?;

    // Assert
    assert!(!options.has_error_filter());
    assert_eq!(options.concat_options().label(), Some("reports"));

    Ok(())
}

#[test]
fn test_malformed_pass_through_options_are_rejected() {
    // Arrange
    let value = json!({ "label": 42 });

    // Act
    let result = FallbackOptions::from_value(&value);

    // Assert
    assert!(matches!(result, Err(FallbackError::InvalidOptions { .. })));
}

#[test]
fn test_try_from_json_value() -> anyhow::Result<()> {
    // Arrange
    let value = json!({ "error_filter": { "pattern": "refused$" } });

    // Act
    let options = FallbackOptions::try_from(&value)?;

    // Assert
    assert!(options.error_filter().matches(&test_error("connection refused")));

    Ok(())
}

#[test]
fn test_builder_matches_json_options() -> anyhow::Result<()> {
    // Arrange
    let typed = FallbackOptions::new()
        .with_error_filter(ErrorFilter::from_pattern("timed out"))
        .with_label("catalog");

    // Act
    let dynamic = FallbackOptions::from_value(&json!({
        "errorFilter": { "pattern": "timed out" },
        "label": "catalog",
    }))?;

    // Assert
    assert_eq!(typed.concat_options(), dynamic.concat_options());
    assert_eq!(typed.has_error_filter(), dynamic.has_error_filter());

    Ok(())
}

#[test]
fn test_with_concat_options_replaces_pass_through_options() {
    // Arrange
    let concat = ConcatOptions::new().with_label("inventory");

    // Act
    let options = FallbackOptions::new()
        .with_label("ignored")
        .with_concat_options(concat.clone());

    // Assert
    assert_eq!(options.concat_options(), &concat);
}

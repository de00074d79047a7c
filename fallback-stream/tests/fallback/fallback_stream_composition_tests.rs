// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fallback_stream::prelude::*;
use fallback_test_utils::test_data::{cache, mirror, primary, Origin};
use fallback_test_utils::{drain, failing_source, test_error, values, ErrorInjectingStream};
use futures::{stream, StreamExt};

#[tokio::test]
async fn test_nested_fallback_stream_as_source() -> anyhow::Result<()> {
    // Arrange
    let inner = fallback_stream(
        vec![
            Source::ready(failing_source(Vec::new(), test_error("primary down"))),
            Source::ready(values(vec![mirror(1)])),
        ],
        FallbackOptions::new(),
    );
    let inner_log = inner.error_log();
    let outer = fallback_stream(
        vec![Source::ready(inner), Source::ready(values(vec![cache(1)]))],
        FallbackOptions::new(),
    );
    let outer_log = outer.error_log();

    // Act
    let (items, error) = drain(outer, 500).await;

    // Assert
    assert_eq!(items, vec![mirror(1)]);
    assert!(error.is_none());
    assert_eq!(inner_log.len(), 1);
    assert!(outer_log.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_exhausted_nested_stream_falls_back_in_outer() -> anyhow::Result<()> {
    // Arrange
    let last_inner = test_error("mirror down");
    let outer = fallback_stream(
        vec![
            Source::lazy({
                let last_inner = last_inner.clone();
                move || {
                    fallback_stream(
                        vec![
                            Source::ready(failing_source(Vec::new(), test_error("primary down"))),
                            Source::ready(failing_source(Vec::new(), last_inner)),
                        ],
                        FallbackOptions::new(),
                    )
                }
            }),
            Source::ready(values(vec![cache(1)])),
        ],
        FallbackOptions::new(),
    );
    let outer_log = outer.error_log();

    // Act
    let (items, error) = drain(outer, 500).await;

    // Assert
    assert_eq!(items, vec![cache(1)]);
    assert!(error.is_none());
    assert_eq!(outer_log.len(), 1);
    assert!(outer_log.snapshot()[0].is_same(&last_inner));

    Ok(())
}

#[tokio::test]
async fn test_error_injected_mid_stream_falls_back() -> anyhow::Result<()> {
    // Arrange
    let base = stream::iter(vec![primary(1), primary(2), primary(3)]);
    let combined = fallback_stream(
        vec![
            Source::ready(ErrorInjectingStream::new(base, 2, test_error("read timed out"))),
            Source::ready(values(vec![mirror(3)])),
        ],
        FallbackOptions::new().with_pattern("timed out"),
    );

    // Act
    let (items, error) = drain(combined, 500).await;

    // Assert
    assert_eq!(items, vec![primary(1), primary(2), mirror(3)]);
    assert!(error.is_none());

    Ok(())
}

#[tokio::test]
async fn test_combined_stream_composes_with_stream_ext() -> anyhow::Result<()> {
    // Arrange
    let combined = fallback_stream(
        vec![
            Source::ready(failing_source(vec![primary(1)], test_error("primary down"))),
            Source::ready(values(vec![mirror(2), mirror(3), mirror(4)])),
        ],
        FallbackOptions::new(),
    );

    // Act
    let origins: Vec<Origin> = combined
        .take(3)
        .map(|item| item.map(|record| record.origin))
        .filter_map(|item| async move { item.ok() })
        .collect()
        .await;

    // Assert
    assert_eq!(origins, vec![Origin::Primary, Origin::Mirror, Origin::Mirror]);

    Ok(())
}

#[tokio::test]
async fn test_combined_stream_can_be_consumed_on_another_task() -> anyhow::Result<()> {
    // Arrange
    let combined = fallback_stream(
        vec![
            Source::ready(failing_source(Vec::new(), test_error("primary down"))),
            Source::lazy(|| values(vec![1, 2])),
        ],
        FallbackOptions::new(),
    );
    let log = combined.error_log();

    // Act
    let (items, error) = tokio::spawn(drain(combined, 500)).await?;

    // Assert
    assert_eq!(items, vec![1, 2]);
    assert!(error.is_none());
    assert_eq!(log.len(), 1);

    Ok(())
}

/*!
 * Tests for error types and conversions
 */

use std::error::Error;
use cleancut::errors::{AppError, FilterError, PlanError, ProbeError, SubtitleError, TimeError, FORMAT_HINT};

/// Test that format errors carry the remediation hint
#[test]
fn test_subtitleError_display_shouldIncludeHint() {
    let err = SubtitleError::FormatError {
        file: "movie.srt".to_string(),
        reason: "no subtitle blocks found".to_string(),
    };

    let message = err.to_string();
    assert!(message.contains("movie.srt"));
    assert!(message.contains("no subtitle blocks found"));
    assert!(message.contains(FORMAT_HINT));
}

/// Test that plan errors expose the timestamp error as their source
#[test]
fn test_planError_parseError_shouldChainSource() {
    let err = PlanError::ParseError {
        caption_id: 7,
        source: TimeError::ParseError {
            timestamp: "xx".to_string(),
            reason: "bad".to_string(),
        },
    };

    assert!(err.to_string().starts_with("Caption 7:"));
    assert!(err.source().is_some());
}

/// Test conversions into the application error
#[test]
fn test_appError_from_shouldWrapEachKind() {
    let probe: AppError = ProbeError::Timeout { file: "a.mp4".to_string(), secs: 60 }.into();
    assert!(matches!(probe, AppError::Probe(_)));
    assert!(probe.to_string().contains("60s"));

    let plan: AppError = PlanError::DurationError("NaN".to_string()).into();
    assert!(matches!(plan, AppError::Plan(_)));

    let filter: AppError = FilterError::InvalidPattern { pattern: "(".to_string(), reason: "unclosed".to_string() }.into();
    assert!(matches!(filter, AppError::Filter(_)));

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));

    let other: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(other, AppError::Unknown(_)));
}

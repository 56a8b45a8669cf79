/*!
 * Tests for subtitle parsing and serialization
 */

use std::fmt::Write;
use anyhow::Result;
use cleancut::errors::SubtitleError;
use cleancut::subtitle_processor::{self, Caption, CaptionTrack, MarkerSet};
use cleancut::timecode::Seconds;
use proptest::prelude::*;
use crate::common;

/// Test parsing a well-formed file
#[test]
fn test_parseSrtString_withSampleTrack_shouldReadEveryCaption() {
    let captions = subtitle_processor::parse_srt_string(common::SAMPLE_SRT).unwrap();

    assert_eq!(captions.len(), 3);
    assert_eq!(captions[0].id, 1);
    assert_eq!(captions[0].start, "00:00:00,000");
    assert_eq!(captions[0].end, "00:00:01,000");
    assert_eq!(captions[0].text, "Good morning.");
    assert_eq!(captions[2].id, 3);
    assert_eq!(captions[2].text, "Let's get started.");
}

/// Test CRLF line endings and multi-line text
#[test]
fn test_parseSrtString_withCrlfAndMultilineText_shouldJoinLines() {
    let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nfirst line\r\nsecond line\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nthird\r\n";

    let captions = subtitle_processor::parse_srt_string(content).unwrap();

    assert_eq!(captions.len(), 2);
    assert_eq!(captions[0].text, "first line\nsecond line");
    assert_eq!(captions[1].start, "00:00:03,000");
}

/// Test that a byte-order mark is tolerated
#[test]
fn test_parseSrtString_withBom_shouldParse() {
    let content = format!("\u{feff}{}", common::SAMPLE_SRT);
    let captions = subtitle_processor::parse_srt_string(&content).unwrap();
    assert_eq!(captions.len(), 3);
}

/// Test that source numbering is ignored in favour of position
#[test]
fn test_parseSrtString_withOddNumbering_shouldAssignPositionalIds() {
    let content = "7\n00:00:01,000 --> 00:00:02,000\na\n\n7\n00:00:03,000 --> 00:00:04,000\nb\n\n3\n00:00:05,000 --> 00:00:06,000\nc\n";

    let captions = subtitle_processor::parse_srt_string(content).unwrap();

    let ids: Vec<usize> = captions.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

/// Test that position hints after the end time are dropped
#[test]
fn test_parseSrtString_withPositionHints_shouldKeepTimesOnly() {
    let content = "1\n00:00:01,000 --> 00:00:02,000 X1:100 X2:200 Y1:10 Y2:20\nhello\n";

    let captions = subtitle_processor::parse_srt_string(content).unwrap();

    assert_eq!(captions[0].end, "00:00:02,000");
}

/// Test that inline markers are detected and the text kept verbatim
#[test]
fn test_parseSrtString_withMarkers_shouldAnnotate() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nfine !remove!\n\n2\n00:00:03,000 --> 00:00:04,000\ndamn !ignore!\n";

    let captions = subtitle_processor::parse_srt_string(content).unwrap();

    assert!(captions[0].annotations.force_remove);
    assert!(!captions[0].annotations.force_ignore);
    assert_eq!(captions[0].text, "fine !remove!");
    assert!(captions[1].annotations.force_ignore);
}

/// Test custom marker tokens
#[test]
fn test_parseSrtWithSource_withCustomMarkers_shouldUseThem() {
    let markers = MarkerSet::new("[cut]", "[keep]");
    let content = "1\n00:00:01,000 --> 00:00:02,000\nsomething [cut]\n";

    let captions = subtitle_processor::parse_srt_with_source(content, "custom.srt", &markers).unwrap();

    assert!(captions[0].annotations.force_remove);
    assert_eq!(markers.strip(&captions[0].text), "something");
}

/// Test that a block without a time line is a format error with a hint
#[test]
fn test_parseSrtString_withMissingTimeLine_shouldFailWithHint() {
    let content = "\n\n1\nno times here\n\n2\n00:00:03,000 --> 00:00:04,000\nb\n";

    let err = subtitle_processor::parse_srt_string(content).unwrap_err();

    assert!(matches!(err, SubtitleError::FormatError { .. }));
    let message = err.to_string();
    assert!(message.contains("block 1"));
    assert!(message.contains("UTF-8"));
}

/// Test that empty input is a format error
#[test]
fn test_parseSrtString_withEmptyInput_shouldFail() {
    assert!(subtitle_processor::parse_srt_string("").is_err());
    assert!(subtitle_processor::parse_srt_string("\n\n\n").is_err());
}

/// Test serialization and reparse
#[test]
fn test_serialize_withParsedCaptions_shouldReproduceInput() {
    let captions = subtitle_processor::parse_srt_string(common::SAMPLE_SRT).unwrap();

    let output = subtitle_processor::serialize(&captions);
    let reparsed = subtitle_processor::parse_srt_string(&output).unwrap();

    assert_eq!(reparsed, captions);
    assert!(output.starts_with("1\n00:00:00,000 --> 00:00:01,000\nGood morning.\n\n2\n"));
}

// Caption text from words that can never form a sequence line, so an
// internal blank line is always followed by text
fn caption_text_strategy() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec!["Hello", "world", "damn", "-", "Hi.", "it's", "okay,", "!remove!", "!ignore!"]);
    let line = (prop::collection::vec(word, 1..5), prop::sample::select(vec![" ", "  "]))
        .prop_map(|(words, sep)| words.join(sep));
    (prop::collection::vec(line, 1..4), prop::collection::vec(any::<bool>(), 3)).prop_map(|(lines, blanks)| {
        let mut text = String::new();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                text.push_str(if blanks[idx - 1] { "\n\n" } else { "\n" });
            }
            text.push_str(line);
        }
        text
    })
}

fn track_strategy() -> impl Strategy<Value = Vec<Caption>> {
    prop::collection::vec((0i64..10_000_000, 0i64..100_000, caption_text_strategy()), 1..12).prop_map(|items| {
        let markers = MarkerSet::default();
        items
            .into_iter()
            .enumerate()
            .map(|(idx, (start, len, text))| {
                let mut caption = Caption::from_seconds(
                    idx + 1,
                    Seconds::from_millis(start),
                    Seconds::from_millis(start + len),
                    text,
                );
                caption.annotations = markers.annotate(&caption.text);
                caption
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_serialize_withAnyTrack_shouldParseBackIdentically(captions in track_strategy(), crlf in any::<bool>()) {
        let mut output = subtitle_processor::serialize(&captions);
        if crlf {
            output = output.replace('\n', "\r\n");
        }

        let reparsed = subtitle_processor::parse_srt_string(&output).unwrap();

        prop_assert_eq!(reparsed, captions);
    }
}

/// Test that serialization renumbers ids
#[test]
fn test_serialize_withGappedIds_shouldRenumber() {
    let captions = vec![
        Caption::new(4, "00:00:01,000", "00:00:02,000", "a"),
        Caption::new(9, "00:00:03,000", "00:00:04,000", "b"),
    ];

    let output = subtitle_processor::serialize(&captions);

    assert_eq!(output, "1\n00:00:01,000 --> 00:00:02,000\na\n\n2\n00:00:03,000 --> 00:00:04,000\nb\n\n");
}

/// Test caption display and report line formatting
#[test]
fn test_caption_display_withValidCaption_shouldFormatBlock() {
    let caption = Caption::new(3, "00:00:05,000", "00:00:06,000", "Well,\ndamn.");
    let mut output = String::new();
    write!(output, "{}", caption).unwrap();

    assert_eq!(output, "3\n00:00:05,000 --> 00:00:06,000\nWell,\ndamn.\n\n");
    assert_eq!(caption.report_line(), "00:00:05,000 - 00:00:06,000 \tWell, damn.");
}

/// Test reading and writing a track on disk
#[test]
fn test_captionTrack_withFileRoundTrip_shouldPreserveCaptions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let track = CaptionTrack::from_srt_file(&input, &MarkerSet::default())?;
    let output = temp_dir.path().join("nested").join("copy.srt");
    track.write_to_srt(&output)?;

    let reread = CaptionTrack::from_srt_file(&output, &MarkerSet::default())?;
    assert_eq!(reread.captions, track.captions);
    assert_eq!(track.source_file, input);
    Ok(())
}

/// Test that a missing file is reported as a format error naming it
#[test]
fn test_parseSrtFile_withMissingFile_shouldNameFile() {
    let err = subtitle_processor::parse_srt_file(std::path::Path::new("/no/such/file.srt"), &MarkerSet::default())
        .unwrap_err();
    assert!(err.to_string().contains("/no/such/file.srt"));
}

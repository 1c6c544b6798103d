/*!
 * Tests for failure classification
 */

use wordharvest::errors::{AppError, DictionaryError, ExtractionError, FailureKind, MediaError};

#[test]
fn test_failureKind_display_shouldBeKebabCase() {
    assert_eq!(FailureKind::NotAValidContainer.to_string(), "not-a-valid-container");
    assert_eq!(FailureKind::NoSubtitles.to_string(), "no-subtitles");
    assert_eq!(FailureKind::NoEnglishTrack.to_string(), "no-english-track");
    assert_eq!(FailureKind::ParseError.to_string(), "parse-error");
    assert_eq!(FailureKind::Unexpected.to_string(), "unexpected");
}

#[test]
fn test_failureKind_serde_shouldMatchDisplay() {
    let json = serde_json::to_string(&FailureKind::NoEnglishTrack).unwrap();
    assert_eq!(json, "\"no-english-track\"");
}

#[test]
fn test_extractionError_kind_shouldClassifyEveryVariant() {
    let cases = vec![
        (ExtractionError::InvalidContainer("x".into()), FailureKind::NotAValidContainer),
        (ExtractionError::NoSubtitles("x".into()), FailureKind::NoSubtitles),
        (ExtractionError::NoEnglishTrack("x".into()), FailureKind::NoEnglishTrack),
        (ExtractionError::Parse("x".into()), FailureKind::ParseError),
        (ExtractionError::UnsupportedInput("x".into()), FailureKind::ParseError),
        (ExtractionError::Transcode("x".into()), FailureKind::ParseError),
        (
            ExtractionError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            FailureKind::ParseError,
        ),
        (ExtractionError::Dictionary(DictionaryError::LockPoisoned), FailureKind::Unexpected),
        (ExtractionError::Unexpected("x".into()), FailureKind::Unexpected),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{}", error);
    }
}

#[test]
fn test_extractionError_fromMediaError_shouldKeepMediaKind() {
    let invalid: ExtractionError = MediaError::InvalidContainer("bad header".into()).into();
    assert_eq!(invalid.kind(), FailureKind::NotAValidContainer);

    let unsupported: ExtractionError = MediaError::UnsupportedCodec("dvd_subtitle".into()).into();
    assert_eq!(unsupported.kind(), FailureKind::ParseError);

    let timeout: ExtractionError = MediaError::Timeout {
        tool: "ffmpeg".into(),
        secs: 120,
    }
    .into();
    assert_eq!(timeout.kind(), FailureKind::Unexpected);
}

#[test]
fn test_appError_fromExtraction_shouldMentionKind() {
    let error = AppError::from(ExtractionError::NoEnglishTrack("#0 subrip [fre]".into()));
    assert!(error.to_string().contains("no-english-track"));
}

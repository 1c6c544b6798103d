/*!
 * Tests for English subtitle track selection
 */

use std::path::Path;
use std::sync::Arc;

use wordharvest::errors::{ExtractionError, FailureKind};
use wordharvest::nlp::StopwordLanguageDetector;
use wordharvest::subtitle::{RawCaption, SubtitleTrack, TrackSelector};
use crate::common::{self, FixedLanguageDetector, MockContainer, MockMediaReader};
use crate::common::mock_media::{english_captions, french_captions};

const MOVIE: &str = "/media/movie.mkv";

fn selector() -> TrackSelector {
    TrackSelector::new(Arc::new(StopwordLanguageDetector::new()), 10)
}

fn reader_with(tracks: Vec<(SubtitleTrack, Vec<RawCaption>)>) -> MockMediaReader {
    MockMediaReader::new().with(MOVIE, MockContainer::Tracks(tracks))
}

fn ids(tracks: &[(SubtitleTrack, Vec<RawCaption>)]) -> Vec<SubtitleTrack> {
    tracks.iter().map(|(t, _)| t.clone()).collect()
}

#[tokio::test]
async fn test_select_withEnglishTag_shouldNotReadCaptions() {
    common::init_logging();
    let tracks = vec![
        (SubtitleTrack::new(0, 2, "subrip").with_language("fre"), french_captions()),
        (SubtitleTrack::new(1, 3, "subrip").with_language("eng"), english_captions()),
    ];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let selector = TrackSelector::new(Arc::new(FixedLanguageDetector::new("fra")), 10);
    let selected = selector.select(&reader, Path::new(MOVIE), &listed).await.unwrap();

    assert_eq!(selected.track.id, 1);
    assert!(selected.captions.is_none());
    // only the untagged-English track was sampled
    assert_eq!(reader.read_count(), 1);
}

#[tokio::test]
async fn test_select_withSdhTrack_shouldPreferIt() {
    let tracks = vec![
        (SubtitleTrack::new(0, 2, "subrip").with_language("en"), english_captions()),
        (
            SubtitleTrack::new(1, 3, "subrip").with_language("eng").with_name("English (SDH)"),
            english_captions(),
        ),
    ];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let selected = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap();
    assert_eq!(selected.track.id, 1);
}

#[tokio::test]
async fn test_select_withoutSdh_shouldPickFirstQualifying() {
    let tracks = vec![
        (SubtitleTrack::new(0, 2, "subrip").with_language("fre"), french_captions()),
        (SubtitleTrack::new(1, 3, "subrip").with_language("en-US"), english_captions()),
        (SubtitleTrack::new(2, 4, "subrip").with_language("eng"), english_captions()),
    ];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let selected = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap();
    assert_eq!(selected.track.id, 1);
}

#[tokio::test]
async fn test_select_withUntaggedEnglish_shouldDetectAndKeepSample() {
    let tracks = vec![
        (SubtitleTrack::new(0, 2, "subrip"), french_captions()),
        (SubtitleTrack::new(1, 3, "ass").with_language("und"), english_captions()),
    ];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let selected = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap();
    assert_eq!(selected.track.id, 1);
    assert_eq!(selected.captions, Some(english_captions()));
    assert_eq!(reader.read_count(), 2);
}

#[tokio::test]
async fn test_select_withNoEnglish_shouldListTracks() {
    let tracks = vec![
        (SubtitleTrack::new(0, 2, "subrip").with_language("fre"), french_captions()),
        (SubtitleTrack::new(1, 3, "subrip"), french_captions()),
    ];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let error = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::NoEnglishTrack);
    assert!(error.to_string().contains("#0 subrip [fre]"));
    assert!(error.to_string().contains("#1 subrip [und]"));
}

#[tokio::test]
async fn test_select_withSilentDetector_shouldNotQualify() {
    let tracks = vec![(SubtitleTrack::new(0, 2, "subrip"), english_captions())];
    let listed = ids(&tracks);
    let reader = reader_with(tracks);

    let selector = TrackSelector::new(Arc::new(FixedLanguageDetector::silent()), 10);
    let error = selector.select(&reader, Path::new(MOVIE), &listed).await.unwrap_err();
    assert!(matches!(error, ExtractionError::NoEnglishTrack(_)));
}

#[tokio::test]
async fn test_select_withBitmapOnly_shouldBeNoSubtitles() {
    let listed = vec![
        SubtitleTrack::new(0, 2, "hdmv_pgs_subtitle").with_language("eng"),
        SubtitleTrack::new(1, 3, "dvd_subtitle"),
    ];
    let reader = MockMediaReader::new().with(MOVIE, MockContainer::Unreadable(listed.clone()));

    let error = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::NoSubtitles);
    assert_eq!(reader.read_count(), 0);
}

#[tokio::test]
async fn test_select_withEmptyTrackList_shouldBeNoSubtitles() {
    let reader = MockMediaReader::new();
    let error = selector().select(&reader, Path::new(MOVIE), &[]).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::NoSubtitles);
}

#[tokio::test]
async fn test_select_withUnreadableSample_shouldSkipTrack() {
    let listed = vec![SubtitleTrack::new(0, 2, "subrip")];
    let reader = MockMediaReader::new().with(MOVIE, MockContainer::Unreadable(listed.clone()));

    let error = selector().select(&reader, Path::new(MOVIE), &listed).await.unwrap_err();
    assert_eq!(error.kind(), FailureKind::NoEnglishTrack);
}

#[test]
fn test_sampleIsEnglish_shouldOnlyUseFirstCaptions() {
    let selector = TrackSelector::new(Arc::new(StopwordLanguageDetector::new()), 2);
    let track = SubtitleTrack::new(0, 2, "subrip");

    let mut captions = french_captions();
    captions.extend(english_captions());
    assert!(!selector.sample_is_english(&track, &captions));

    let mut captions = english_captions();
    captions.extend(french_captions());
    assert!(selector.sample_is_english(&track, &captions));
}

#[test]
fn test_isSdh_shouldMatchCaseInsensitively() {
    assert!(TrackSelector::is_sdh(&SubtitleTrack::new(0, 0, "subrip").with_name("eng sdh")));
    assert!(!TrackSelector::is_sdh(&SubtitleTrack::new(0, 0, "subrip").with_name("Forced")));
    assert!(!TrackSelector::is_sdh(&SubtitleTrack::new(0, 0, "subrip")));
}

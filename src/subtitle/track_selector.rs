/*!
 * English subtitle track selection.
 *
 * A track qualifies when its language tag names English, or when the
 * language detector predicts English over its first captions. Among the
 * qualifying tracks an SDH track wins, otherwise the first in container
 * order.
 */

use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::errors::ExtractionError;
use crate::language_utils;
use crate::nlp::LanguageDetector;
use crate::subtitle::container::{MediaReader, RawCaption, SubtitleTrack};

/// Default number of captions sampled for detection
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Detector code for English
const ENGLISH: &str = "eng";

/// The chosen track, with its captions when they were already read
#[derive(Debug, Clone)]
pub struct SelectedTrack {
    pub track: SubtitleTrack,
    pub captions: Option<Vec<RawCaption>>,
}

pub struct TrackSelector {
    detector: Arc<dyn LanguageDetector>,
    sample_size: usize,
}

impl TrackSelector {
    pub fn new(detector: Arc<dyn LanguageDetector>, sample_size: usize) -> Self {
        Self {
            detector,
            sample_size: sample_size.max(1),
        }
    }

    /// Whether the track's language tag names English
    pub fn has_english_tag(track: &SubtitleTrack) -> bool {
        track.language.as_deref().is_some_and(language_utils::is_english_tag)
    }

    /// Whether a track name marks it as SDH
    pub fn is_sdh(track: &SubtitleTrack) -> bool {
        track
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains("sdh"))
    }

    /// Whether the detector predicts English for the first captions
    pub fn sample_is_english(&self, track: &SubtitleTrack, captions: &[RawCaption]) -> bool {
        let sample = captions
            .iter()
            .take(self.sample_size)
            .map(|c| track.payload.clean(&c.raw_text))
            .collect::<Vec<_>>()
            .join(" ");

        if sample.trim().is_empty() {
            return false;
        }

        match self.detector.predict(&sample) {
            Some(prediction) => {
                debug!(
                    "Track {} detected as {} ({:.2})",
                    track.describe(),
                    prediction.lang,
                    prediction.confidence
                );
                prediction.lang == ENGLISH
            }
            None => false,
        }
    }

    /// Pick the English track of `path`, reading samples through `reader`
    /// for tracks whose tag is missing or not English.
    pub async fn select(
        &self,
        reader: &dyn MediaReader,
        path: &Path,
        tracks: &[SubtitleTrack],
    ) -> Result<SelectedTrack, ExtractionError> {
        if tracks.is_empty() {
            return Err(ExtractionError::NoSubtitles(format!("{:?} has no subtitle tracks", path)));
        }

        let text_tracks: Vec<&SubtitleTrack> = tracks.iter().filter(|t| !t.payload.is_bitmap()).collect();
        if text_tracks.is_empty() {
            warn!("Skipping {} bitmap subtitle track(s) in {:?}", tracks.len(), path);
            return Err(ExtractionError::NoSubtitles(format!(
                "{:?} only has bitmap subtitle tracks",
                path
            )));
        }

        let mut qualifying: Vec<SelectedTrack> = Vec::new();
        for track in text_tracks {
            if Self::has_english_tag(track) {
                qualifying.push(SelectedTrack {
                    track: track.clone(),
                    captions: None,
                });
                continue;
            }

            let captions = match reader.read_captions(path, track).await {
                Ok(captions) => captions,
                Err(e) => {
                    warn!("Could not sample track {}: {}", track.describe(), e);
                    continue;
                }
            };
            if self.sample_is_english(track, &captions) {
                qualifying.push(SelectedTrack {
                    track: track.clone(),
                    captions: Some(captions),
                });
            }
        }

        let chosen = match qualifying.iter().position(|s| Self::is_sdh(&s.track)) {
            Some(i) => Some(qualifying.swap_remove(i)),
            None => qualifying.into_iter().next(),
        };

        match chosen {
            Some(selected) => {
                info!("Selected subtitle track {}", selected.track.describe());
                Ok(selected)
            }
            None => Err(ExtractionError::NoEnglishTrack(
                tracks.iter().map(SubtitleTrack::describe).collect::<Vec<_>>().join(", "),
            )),
        }
    }
}

/*!
 * Single-input vocabulary builds.
 *
 * Every input kind ends in the same two steps: text units go through
 * `collect_unit` into a `CitationMap`, then the `DictionaryValidator` turns
 * the map into the word list of a fresh `Vocabulary`.
 */

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::dictionary::Dictionary;
use crate::errors::{ExtractionError, MediaError};
use crate::extraction::{collect_unit, CitationMap, ExtractionOptions};
use crate::file_utils::{FileManager, InputKind};
use crate::nlp::NlpModels;
use crate::pipeline::validator::DictionaryValidator;
use crate::subtitle::{
    parse_srt_file, CaptionPayload, MediaReader, RawCaption, SubtitleEntry, SubtitleTrack, SubtitleTranscoder,
    TrackSelector,
};
use crate::vocabulary::{Vocabulary, VocabularyType};

/// Language recorded on built vocabularies
pub const VOCABULARY_LANGUAGE: &str = "english";

/// Receives human-readable progress text
pub type ProgressSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// A progress sink that ignores everything
pub fn no_progress(_: &str) {}

/// Builds one `Vocabulary` from one input
pub struct VocabularyBuilder {
    models: NlpModels,
    validator: DictionaryValidator,
    reader: Arc<dyn MediaReader>,
    transcoder: Arc<dyn SubtitleTranscoder>,
    selector: TrackSelector,
    options: ExtractionOptions,
}

impl VocabularyBuilder {
    pub fn new(
        dictionary: Arc<dyn Dictionary>,
        models: NlpModels,
        reader: Arc<dyn MediaReader>,
        transcoder: Arc<dyn SubtitleTranscoder>,
        options: ExtractionOptions,
        language_sample_size: usize,
    ) -> Self {
        let selector = TrackSelector::new(Arc::clone(&models.detector), language_sample_size);
        Self {
            models,
            validator: DictionaryValidator::new(dictionary),
            reader,
            transcoder,
            selector,
            options,
        }
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn models(&self) -> &NlpModels {
        &self.models
    }

    /// Build a vocabulary from any supported input. For media containers
    /// `track` forces a subtitle track; otherwise one is selected.
    pub async fn build(
        &self,
        path: &Path,
        track: Option<usize>,
        progress: ProgressSink<'_>,
    ) -> Result<Vocabulary, ExtractionError> {
        let kind = FileManager::detect_input_kind(path);
        debug!("Building vocabulary from {:?} as {:?}", path, kind);

        match kind {
            InputKind::Document => {
                progress("Loading document");
                let text = FileManager::read_text_lossy(path)?;
                self.build_from_text(&FileManager::file_stem(path), &text, progress)
            }
            InputKind::Srt => self.build_from_srt(path, progress),
            InputKind::Ass => self.build_from_ass(path, progress).await,
            InputKind::Media => self.build_from_media(path, track, progress).await,
            InputKind::Unsupported => Err(ExtractionError::UnsupportedInput(format!(
                "{:?} is not a document, subtitle or media file",
                path
            ))),
        }
    }

    /// Document path: segment, then collect per sentence without timing
    pub fn build_from_text(&self, name: &str, text: &str, progress: ProgressSink<'_>) -> Result<Vocabulary, ExtractionError> {
        progress("Segmenting sentences");
        let sentences = self.models.segmenter.segment(text);

        progress("Extracting words");
        let mut citations = CitationMap::new();
        for sentence in sentences.iter().filter(|s| !s.is_empty()) {
            collect_unit(&self.models, &self.options, &mut citations, sentence, "", "");
        }
        debug!("{} sentences yielded {} candidates", sentences.len(), citations.len());

        self.finish(Vocabulary::new(name, VocabularyType::Document, VOCABULARY_LANGUAGE), &citations, progress)
    }

    /// SRT path: one unit per normalized caption
    pub fn build_from_srt(&self, path: &Path, progress: ProgressSink<'_>) -> Result<Vocabulary, ExtractionError> {
        progress("Parsing subtitles");
        let entries = parse_srt_file(path)?;
        self.build_from_entries(&FileManager::file_stem(path), &entries, progress)
    }

    /// Build a SUBTITLES vocabulary from parsed SRT entries
    pub fn build_from_entries(
        &self,
        name: &str,
        entries: &[SubtitleEntry],
        progress: ProgressSink<'_>,
    ) -> Result<Vocabulary, ExtractionError> {
        let captions: Vec<RawCaption> = entries.iter().cloned().map(RawCaption::from).collect();
        let citations = self.collect_captions(&captions, CaptionPayload::Text, progress);
        self.finish(Vocabulary::new(name, VocabularyType::Subtitles, VOCABULARY_LANGUAGE), &citations, progress)
    }

    /// ASS/SSA path: transcode to SRT in a scratch directory, then the SRT path
    pub async fn build_from_ass(&self, path: &Path, progress: ProgressSink<'_>) -> Result<Vocabulary, ExtractionError> {
        progress("Converting subtitles to SRT");
        let scratch = tempfile::tempdir()?;
        let converted = scratch.path().join("converted.srt");

        self.transcoder
            .convert_to_srt(path, &converted)
            .await
            .map_err(|e| ExtractionError::Transcode(e.to_string()))?;

        let entries = parse_srt_file(&converted)?;
        self.build_from_entries(&FileManager::file_stem(path), &entries, progress)
    }

    /// Media path: validate the container, pick a track, read its captions
    pub async fn build_from_media(
        &self,
        path: &Path,
        track: Option<usize>,
        progress: ProgressSink<'_>,
    ) -> Result<Vocabulary, ExtractionError> {
        progress("Reading media container");
        self.reader.probe(path).await?;

        let tracks = self.reader.list_tracks(path).await?;
        if tracks.is_empty() {
            return Err(ExtractionError::NoSubtitles(format!("{:?} has no subtitle tracks", path)));
        }

        let (track, captions) = match track {
            Some(id) => {
                let track = Self::forced_track(&tracks, id)?;
                (track, None)
            }
            None => {
                progress("Selecting subtitle track");
                let selected = self.selector.select(self.reader.as_ref(), path, &tracks).await?;
                (selected.track, selected.captions)
            }
        };

        let captions = match captions {
            Some(captions) => captions,
            None => {
                progress("Extracting subtitles");
                self.reader.read_captions(path, &track).await?
            }
        };
        info!("Read {} captions from track {}", captions.len(), track.describe());

        let citations = self.collect_captions(&captions, track.payload, progress);
        let vocabulary = Vocabulary::new(FileManager::file_stem(path), VocabularyType::Mkv, VOCABULARY_LANGUAGE)
            .with_video(path.to_string_lossy(), track.id);
        self.finish(vocabulary, &citations, progress)
    }

    fn forced_track(tracks: &[SubtitleTrack], id: usize) -> Result<SubtitleTrack, ExtractionError> {
        let track = tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or(MediaError::TrackNotFound(id))?;
        if track.payload.is_bitmap() {
            return Err(MediaError::UnsupportedCodec(track.codec.clone()).into());
        }
        Ok(track.clone())
    }

    fn collect_captions(&self, captions: &[RawCaption], payload: CaptionPayload, progress: ProgressSink<'_>) -> CitationMap {
        progress("Extracting words");
        let mut citations = CitationMap::new();
        for caption in captions {
            let content = payload.clean(&caption.raw_text);
            if content.trim().is_empty() {
                continue;
            }
            collect_unit(
                &self.models,
                &self.options,
                &mut citations,
                &content,
                &caption.start(),
                &caption.end(),
            );
        }
        debug!("{} captions yielded {} candidates", captions.len(), citations.len());
        citations
    }

    fn finish(
        &self,
        mut vocabulary: Vocabulary,
        citations: &CitationMap,
        progress: ProgressSink<'_>,
    ) -> Result<Vocabulary, ExtractionError> {
        progress("Querying dictionary");
        let words = self.validator.validate(citations)?;
        vocabulary.set_words(words);
        info!("Built vocabulary '{}' with {} words", vocabulary.name, vocabulary.size());
        Ok(vocabulary)
    }
}

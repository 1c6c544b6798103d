/*!
 * Mock media collaborators
 *
 * `MockMediaReader` serves canned containers keyed by path so pipeline and
 * batch tests never start ffprobe or ffmpeg.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use wordharvest::errors::MediaError;
use wordharvest::nlp::{LanguageDetector, LanguagePrediction};
use wordharvest::subtitle::{MediaReader, RawCaption, SubtitleTrack, SubtitleTranscoder};

/// What the mock reader finds at a path
#[derive(Debug, Clone)]
pub enum MockContainer {
    /// Not a media container
    Invalid,
    /// A container with these tracks and captions
    Tracks(Vec<(SubtitleTrack, Vec<RawCaption>)>),
    /// Tracks can be listed but reading captions fails
    Unreadable(Vec<SubtitleTrack>),
    /// The demuxer panics
    Panic,
}

/// Canned `MediaReader`
#[derive(Debug, Default)]
pub struct MockMediaReader {
    containers: HashMap<PathBuf, MockContainer>,
    reads: AtomicUsize,
}

impl MockMediaReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container at `path`
    pub fn with(mut self, path: impl Into<PathBuf>, container: MockContainer) -> Self {
        self.containers.insert(path.into(), container);
        self
    }

    /// Number of `read_captions` calls so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn container(&self, path: &Path) -> Result<&MockContainer, MediaError> {
        self.containers
            .get(path)
            .ok_or_else(|| MediaError::InvalidContainer(format!("{:?} does not exist", path)))
    }
}

#[async_trait]
impl MediaReader for MockMediaReader {
    async fn probe(&self, path: &Path) -> Result<(), MediaError> {
        match self.container(path)? {
            MockContainer::Invalid => Err(MediaError::InvalidContainer("bad EBML header".to_string())),
            MockContainer::Panic => panic!("demuxer crashed"),
            _ => Ok(()),
        }
    }

    async fn list_tracks(&self, path: &Path) -> Result<Vec<SubtitleTrack>, MediaError> {
        match self.container(path)? {
            MockContainer::Tracks(tracks) => Ok(tracks.iter().map(|(t, _)| t.clone()).collect()),
            MockContainer::Unreadable(tracks) => Ok(tracks.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn read_captions(&self, path: &Path, track: &SubtitleTrack) -> Result<Vec<RawCaption>, MediaError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.container(path)? {
            MockContainer::Tracks(tracks) => tracks
                .iter()
                .find(|(t, _)| t.id == track.id)
                .map(|(_, captions)| captions.clone())
                .ok_or(MediaError::TrackNotFound(track.id)),
            _ => Err(MediaError::Parse("corrupt subtitle packets".to_string())),
        }
    }
}

/// Transcoder that writes fixed SRT content, or fails
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    output: Option<String>,
}

impl MockTranscoder {
    pub fn writing(srt: &str) -> Self {
        Self {
            output: Some(srt.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { output: None }
    }
}

#[async_trait]
impl SubtitleTranscoder for MockTranscoder {
    async fn convert_to_srt(&self, _input: &Path, output: &Path) -> Result<(), MediaError> {
        match &self.output {
            Some(srt) => Ok(std::fs::write(output, srt)?),
            None => Err(MediaError::Process {
                tool: "mock".to_string(),
                message: "unsupported script version".to_string(),
            }),
        }
    }
}

/// Detector that always predicts the same language
#[derive(Debug, Clone)]
pub struct FixedLanguageDetector {
    lang: Option<String>,
}

impl FixedLanguageDetector {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: Some(lang.to_string()),
        }
    }

    pub fn silent() -> Self {
        Self { lang: None }
    }
}

impl LanguageDetector for FixedLanguageDetector {
    fn predict(&self, _text: &str) -> Option<LanguagePrediction> {
        self.lang.as_ref().map(|lang| LanguagePrediction {
            lang: lang.clone(),
            confidence: 1.0,
        })
    }
}

/// English captions used by container fixtures
pub fn english_captions() -> Vec<RawCaption> {
    vec![
        RawCaption::new(1_000, 3_000, "- The quick brown fox jumps."),
        RawCaption::new(4_000, 6_000, "<i>The lazy dog sleeps.</i>"),
        RawCaption::new(7_000, 9_000, "Hello world!"),
    ]
}

/// French captions used by container fixtures
pub fn french_captions() -> Vec<RawCaption> {
    vec![
        RawCaption::new(1_000, 3_000, "Je ne sais pas où est le chien."),
        RawCaption::new(4_000, 6_000, "C'est très bien, merci."),
    ]
}

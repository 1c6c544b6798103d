/*!
 * Error types for the wordharvest library.
 *
 * Per-file processing failures are expressed as `ExtractionError`, and every
 * variant classifies into exactly one `FailureKind`. The batch runner
 * pattern-matches on that kind instead of inspecting error types.
 */

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed per-file run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The input could not be read as a media container
    NotAValidContainer,
    /// The container carries no (text) subtitle tracks
    NoSubtitles,
    /// None of the subtitle tracks qualifies as English
    NoEnglishTrack,
    /// The input or one of its subtitle streams could not be parsed
    ParseError,
    /// Anything else, including panics caught at the batch boundary
    Unexpected,
}

impl FailureKind {
    /// Stable kebab-case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAValidContainer => "not-a-valid-container",
            Self::NoSubtitles => "no-subtitles",
            Self::NoEnglishTrack => "no-english-track",
            Self::ParseError => "parse-error",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the media container reader and the subtitle transcoders
#[derive(Error, Debug)]
pub enum MediaError {
    /// The file is not something the container reader understands
    #[error("Not a valid media container: {0}")]
    InvalidContainer(String),

    /// An external tool could not be started or exited unsuccessfully
    #[error("{tool} failed: {message}")]
    Process {
        /// Name of the external tool
        tool: String,
        /// Filtered diagnostic output
        message: String,
    },

    /// An external tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Name of the external tool
        tool: String,
        /// Configured timeout
        secs: u64,
    },

    /// The requested subtitle track does not exist
    #[error("Subtitle track {0} not found")]
    TrackNotFound(usize),

    /// The track's codec cannot be turned into text
    #[error("Unsupported subtitle codec: {0}")]
    UnsupportedCodec(String),

    /// Subtitle data came back but could not be parsed
    #[error("Failed to parse subtitle data: {0}")]
    Parse(String),

    /// Filesystem error around temporary or output files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Classify this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidContainer(_) => FailureKind::NotAValidContainer,
            Self::Timeout { .. } | Self::TrackNotFound(_) => FailureKind::Unexpected,
            Self::Process { .. } | Self::UnsupportedCodec(_) | Self::Parse(_) | Self::Io(_) => {
                FailureKind::ParseError
            }
        }
    }
}

/// Errors raised by the dictionary storage
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// No dictionary file at the configured location
    #[error("Dictionary not found at {0:?}")]
    NotFound(PathBuf),

    /// The file exists but is not a usable dictionary
    #[error("Invalid dictionary {path:?}: {message}")]
    Invalid {
        /// Dictionary location
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// SQLite reported an error
    #[error("Dictionary query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Another holder of the connection panicked
    #[error("Dictionary connection lock poisoned")]
    LockPoisoned,
}

/// Typed failure of a single-file vocabulary build
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input could not be read as a media container
    #[error("Not a valid media container: {0}")]
    InvalidContainer(String),

    /// The container has no usable subtitle tracks
    #[error("No subtitles: {0}")]
    NoSubtitles(String),

    /// No subtitle track qualifies as English
    #[error("No English subtitle track found among: {0}")]
    NoEnglishTrack(String),

    /// The input could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The file type is not supported by any extraction path
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// ASS/SSA to SRT conversion failed
    #[error("Subtitle conversion failed: {0}")]
    Transcode(String),

    /// Error from the media container reader
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Error reading the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ExtractionError {
    /// Classify this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidContainer(_) => FailureKind::NotAValidContainer,
            Self::NoSubtitles(_) => FailureKind::NoSubtitles,
            Self::NoEnglishTrack(_) => FailureKind::NoEnglishTrack,
            Self::Parse(_) | Self::UnsupportedInput(_) | Self::Transcode(_) | Self::Io(_) => {
                FailureKind::ParseError
            }
            Self::Media(e) => e.kind(),
            Self::Dictionary(_) | Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a vocabulary build
    #[error("Extraction error ({}): {0}", .0.kind())]
    Extraction(#[from] ExtractionError),

    /// Error from the dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

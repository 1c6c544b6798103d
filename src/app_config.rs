use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Dictionary database path (empty means the platform data directory)
    #[serde(default)]
    pub dictionary_path: String,

    /// Vocabulary extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// External media tool settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Vocabulary filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Extraction settings shared by single-file and batch runs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    // @field: Emit chunked phrases in addition to tokens
    #[serde(default = "default_true")]
    pub enable_phrases: bool,

    // @field: Maximum citation length in tokens
    #[serde(default = "default_sentence_length")]
    pub sentence_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_phrases: default_true(),
            sentence_length: default_sentence_length(),
        }
    }
}

/// Which ASS/SSA to SRT converter to use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscoderKind {
    // @transcoder: Built-in event parser
    #[default]
    Native,
    // @transcoder: ffmpeg subprocess
    Ffmpeg,
}

impl std::fmt::Display for TranscoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Ffmpeg => write!(f, "ffmpeg"),
        }
    }
}

impl std::str::FromStr for TranscoderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "ffmpeg" => Ok(Self::Ffmpeg),
            _ => Err(anyhow!("Invalid transcoder: {}", s)),
        }
    }
}

/// External media tool configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    // @field: Per-invocation timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Captions sampled for language detection
    #[serde(default = "default_language_sample_size")]
    pub language_sample_size: usize,

    // @field: ASS/SSA converter
    #[serde(default)]
    pub transcoder: TranscoderKind,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout_secs(),
            language_sample_size: default_language_sample_size(),
            transcoder: TranscoderKind::default(),
        }
    }
}

/// Post-extraction vocabulary filter configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    // @field: Drop words that parse as numbers
    #[serde(default = "default_true")]
    pub filter_numbers: bool,

    // @field: Drop words with a BNC rank in 1..threshold
    #[serde(default)]
    pub bnc_threshold: Option<i32>,

    // @field: Drop words with an FRQ rank in 1..threshold
    #[serde(default)]
    pub frq_threshold: Option<i32>,

    // @field: Drop words without a BNC rank
    #[serde(default)]
    pub filter_bnc_zero: bool,

    // @field: Drop words without an FRQ rank
    #[serde(default)]
    pub filter_frq_zero: bool,

    // @field: Replace derived forms with their dictionary lemma
    #[serde(default)]
    pub replace_to_lemma: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_numbers: default_true(),
            bnc_threshold: None,
            frq_threshold: None,
            filter_bnc_zero: false,
            filter_frq_zero: false,
            replace_to_lemma: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sentence_length() -> usize {
    25
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_language_sample_size() -> usize {
    10
}

/// Smallest usable citation window
pub const MIN_SENTENCE_LENGTH: usize = 2;

/// Largest number of captions sampled for language detection
pub const MAX_LANGUAGE_SAMPLE_SIZE: usize = 100;

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.extraction.sentence_length < MIN_SENTENCE_LENGTH {
            return Err(anyhow!(
                "sentence_length must be at least {}, got {}",
                MIN_SENTENCE_LENGTH,
                self.extraction.sentence_length
            ));
        }

        if !(1..=MAX_LANGUAGE_SAMPLE_SIZE).contains(&self.media.language_sample_size) {
            return Err(anyhow!(
                "language_sample_size must be between 1 and {}, got {}",
                MAX_LANGUAGE_SAMPLE_SIZE,
                self.media.language_sample_size
            ));
        }

        if self.media.timeout_secs == 0 {
            return Err(anyhow!("media timeout_secs must be greater than zero"));
        }

        for (name, threshold) in [("bnc", self.filter.bnc_threshold), ("frq", self.filter.frq_threshold)] {
            if matches!(threshold, Some(t) if t < 1) {
                return Err(anyhow!("{}_threshold must be positive", name));
            }
        }

        Ok(())
    }

    /// Resolved dictionary location
    pub fn dictionary_location(&self) -> Result<PathBuf> {
        if self.dictionary_path.trim().is_empty() {
            crate::dictionary::DictionaryConnection::default_dictionary_path()
                .map_err(|e| anyhow!("{}", e))
        } else {
            Ok(PathBuf::from(&self.dictionary_path))
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            dictionary_path: String::new(),
            extraction: ExtractionConfig::default(),
            media: MediaConfig::default(),
            filter: FilterConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

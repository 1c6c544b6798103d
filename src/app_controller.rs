use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranscoderKind};
use crate::dictionary::{Dictionary, DictionaryStats, SqliteDictionary};
use crate::errors::AppError;
use crate::extraction::ExtractionOptions;
use crate::file_utils::FileManager;
use crate::nlp::NlpModels;
use crate::pipeline::{BatchJobRunner, BatchReport, VocabularyBuilder};
use crate::subtitle::{FfmpegMediaReader, FfmpegTranscoder, MediaReader, NativeAssTranscoder, SubtitleTranscoder};
use crate::vocabulary::{exclude_known, MatchMode, Vocabulary, VocabularyFilter, VocabularyMatcher, VocabularyType, Word};

// @module: Application controller; owns the dictionary, models and vocabulary files

/// Name of the vocabulary written by batch runs
pub const BATCH_VOCABULARY_NAME: &str = "batch";

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared dictionary connection
    dictionary: Arc<SqliteDictionary>,

    // @field: Loaded NLP models
    models: NlpModels,
}

impl Controller {
    /// Open the configured dictionary and load the built-in models
    pub fn with_config(config: Config) -> Result<Self> {
        let location = config.dictionary_location()?;
        let dictionary = SqliteDictionary::open(&location)
            .map_err(AppError::from)
            .with_context(|| format!("Failed to open dictionary at {:?}", location))?;
        Ok(Self::with_dictionary(config, Arc::new(dictionary)))
    }

    /// Controller over an already opened dictionary
    pub fn with_dictionary(config: Config, dictionary: Arc<SqliteDictionary>) -> Self {
        Self {
            config,
            dictionary,
            models: NlpModels::rule_based(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Assemble a builder from the configuration
    pub fn builder(&self) -> VocabularyBuilder {
        let reader: Arc<dyn MediaReader> = Arc::new(FfmpegMediaReader::new(&self.config.media));
        let transcoder: Arc<dyn SubtitleTranscoder> = match self.config.media.transcoder {
            TranscoderKind::Native => Arc::new(NativeAssTranscoder::new()),
            TranscoderKind::Ffmpeg => Arc::new(FfmpegTranscoder::new(&self.config.media)),
        };

        VocabularyBuilder::new(
            self.dictionary.clone(),
            self.models.clone(),
            reader,
            transcoder,
            ExtractionOptions::from(&self.config.extraction),
            self.config.media.language_sample_size,
        )
    }

    /// Build a vocabulary from one input and write it as JSON
    pub async fn extract(&self, input: &Path, track: Option<usize>, output: Option<PathBuf>) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();
        if !input.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let spinner = Self::spinner();
        let builder = self.builder();
        let progress = |message: &str| spinner.set_message(message.to_string());

        let result = builder.build(input, track, &progress).await;
        spinner.finish_and_clear();

        let vocabulary = result.map_err(AppError::from)?;
        let output = output.unwrap_or_else(|| Self::default_output_path(input));
        Self::write_vocabulary(&vocabulary, &output)?;

        info!(
            "Wrote {} words to {:?} in {}",
            vocabulary.size(),
            output,
            Self::format_duration(start_time.elapsed())
        );
        Ok(output)
    }

    /// Run a batch over files and directories and write the merged vocabulary
    pub async fn batch(&self, inputs: &[PathBuf], output: PathBuf) -> Result<BatchReport> {
        let files = FileManager::find_media_files(inputs)?;
        if files.is_empty() {
            return Err(anyhow!("No media files found in {:?}", inputs));
        }

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let builder = self.builder();
        let runner = BatchJobRunner::new(&builder);
        let progress = |message: &str| progress_bar.set_message(message.to_string());
        let report = runner
            .run(&files, |_path, _ok| progress_bar.inc(1), &progress)
            .await;
        progress_bar.finish_and_clear();

        for (path, failure) in &report.errors {
            error!("{:?}: {}", path, failure);
        }

        let mut vocabulary = Vocabulary::new(BATCH_VOCABULARY_NAME, VocabularyType::Document, crate::pipeline::VOCABULARY_LANGUAGE);
        for word in report.words.iter().cloned() {
            vocabulary.merge_word(word);
        }
        Self::write_vocabulary(&vocabulary, &output)?;

        info!(
            "Batch wrote {} words from {} of {} files to {:?}",
            vocabulary.size(),
            report.succeeded,
            files.len(),
            output
        );
        Ok(report)
    }

    /// Match two vocabulary files
    pub fn match_files(&self, baseline: &Path, comparison: &Path, mode: MatchMode, output: &Path) -> Result<Vocabulary> {
        let baseline = Self::read_vocabulary(baseline)?;
        let comparison = Self::read_vocabulary(comparison)?;

        let matcher = VocabularyMatcher::new(self.models.lemmatizer.clone());
        let result = matcher.match_vocabularies(&baseline, &comparison, mode);
        Self::write_vocabulary(&result, output)?;

        info!("Matched {} words ({:?} mode) into {:?}", result.size(), mode, output);
        Ok(result)
    }

    /// Filter a vocabulary file and drop the words of `excludes`
    pub fn filter_file(&self, input: &Path, excludes: &[PathBuf], output: &Path) -> Result<Vocabulary> {
        let vocabulary = Self::read_vocabulary(input)?;
        let others = excludes
            .iter()
            .map(|path| Self::read_vocabulary(path))
            .collect::<Result<Vec<_>>>()?;

        let filter = VocabularyFilter::new(
            self.dictionary.clone(),
            self.models.lemmatizer.clone(),
            self.config.filter.clone(),
        );
        let mut filtered = filter.filter_vocabulary(&vocabulary).map_err(AppError::from)?;
        if !others.is_empty() {
            let remaining = exclude_known(filtered.words().to_vec(), &others);
            filtered.set_words(remaining);
        }

        Self::write_vocabulary(&filtered, output)?;
        info!("Filtered {} -> {} words into {:?}", vocabulary.size(), filtered.size(), output);
        Ok(filtered)
    }

    /// Single dictionary lookup
    pub fn lookup(&self, word: &str) -> Result<Option<Word>> {
        Ok(self.dictionary.query(word).map_err(AppError::from)?)
    }

    pub fn dictionary_stats(&self) -> Result<DictionaryStats> {
        Ok(self.dictionary.stats().map_err(AppError::from)?)
    }

    /// Load a vocabulary JSON file
    pub fn read_vocabulary(path: &Path) -> Result<Vocabulary> {
        let content = FileManager::read_to_string(path)?;
        let vocabulary: Vocabulary = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse vocabulary file: {:?}", path))?;
        Ok(vocabulary)
    }

    /// Write a vocabulary as pretty JSON
    pub fn write_vocabulary(vocabulary: &Vocabulary, path: &Path) -> Result<()> {
        if vocabulary.is_empty() {
            warn!("Vocabulary '{}' is empty", vocabulary.name);
        }
        let json = serde_json::to_string_pretty(vocabulary).context("Failed to serialize vocabulary")?;
        FileManager::write_to_file(path, &json)
    }

    /// `movie.mkv` -> `movie.json` next to the input
    pub fn default_output_path(input: &Path) -> PathBuf {
        input.with_extension("json")
    }

    fn spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}.{:03}s", secs, duration.subsec_millis())
        }
    }
}

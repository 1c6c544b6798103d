#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use wordharvest::app_config::{self, Config, TranscoderKind};
use wordharvest::app_controller::Controller;
use wordharvest::vocabulary::MatchMode;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI wrapper for TranscoderKind
#[derive(Debug, Clone, ValueEnum)]
enum CliTranscoder {
    Native,
    Ffmpeg,
}

impl From<CliTranscoder> for TranscoderKind {
    fn from(kind: CliTranscoder) -> Self {
        match kind {
            CliTranscoder::Native => TranscoderKind::Native,
            CliTranscoder::Ffmpeg => TranscoderKind::Ffmpeg,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a vocabulary from a document, subtitle file or video
    Extract {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Subtitle track to use (default: auto-select the English track)
        #[arg(short, long)]
        track: Option<usize>,

        /// Only extract single tokens, no phrase chunks
        #[arg(long)]
        no_phrases: bool,

        /// Citation window in tokens
        #[arg(short = 'n', long)]
        sentence_length: Option<usize>,

        /// ASS/SSA converter
        #[arg(long, value_enum)]
        transcoder: Option<CliTranscoder>,

        /// Output vocabulary file (default: INPUT with a .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build one vocabulary from many videos, skipping files that fail
    Batch {
        /// Video files and/or directories (searched recursively)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output vocabulary file
        #[arg(short, long, default_value = "batch.json")]
        output: PathBuf,
    },

    /// Keep the baseline words that also occur in the comparison vocabulary
    Match {
        /// Baseline vocabulary file
        baseline: PathBuf,

        /// Comparison vocabulary file
        comparison: PathBuf,

        /// Compare exact words instead of lemmas
        #[arg(long)]
        literal: bool,

        /// Output vocabulary file
        #[arg(short, long, default_value = "matched.json")]
        output: PathBuf,
    },

    /// Apply the configured frequency filters and drop known words
    Filter {
        /// Vocabulary file to filter
        vocabulary: PathBuf,

        /// Vocabularies whose words should be removed
        #[arg(short, long = "exclude")]
        excludes: Vec<PathBuf>,

        /// Output vocabulary file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look a word up in the dictionary
    Lookup {
        /// Word to look up
        word: String,
    },

    /// Generate shell completions for wordharvest
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// wordharvest - dictionary-backed vocabularies from text, subtitles and videos
#[derive(Parser, Debug)]
#[command(name = "wordharvest")]
#[command(version)]
#[command(about = "Builds vocabulary lists from documents, subtitles and video subtitle tracks")]
#[command(long_about = "wordharvest extracts words and phrases with usage citations from documents, \
SRT/ASS subtitles and the subtitle tracks of video files, keeps the ones found in the dictionary, \
and compares vocabularies.

EXAMPLES:
    wordharvest extract book.txt                   # Document vocabulary -> book.json
    wordharvest extract movie.mkv                  # Auto-selects the English (SDH) track
    wordharvest extract movie.mkv --track 2        # Use a specific subtitle track
    wordharvest batch /series/ -o series.json      # Many videos, failures are skipped
    wordharvest match book.json movie.json         # Lemma match
    wordharvest filter movie.json -e known.json    # Drop known words
    wordharvest completions bash > wordharvest.bash

CONFIGURATION:
    Configuration is stored in wordharvest.json by default. If the file does not
    exist, a default one is created. The dictionary is an ECDICT SQLite database,
    by default in the platform data directory (wordharvest/ecdict.db).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "wordharvest.json")]
    config_path: String,

    /// Dictionary database path
    #[arg(short, long, global = true, env = "WORDHARVEST_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    // The logger accepts everything; log::set_max_level does the filtering
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "✖ "),
            Level::Warn => ("\x1B[1;33m", "⚠ "),
            Level::Info => ("\x1B[1;32m", ""),
            Level::Debug => ("\x1B[1;36m", "· "),
            Level::Trace => ("\x1B[1;35m", "… "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {}{}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the config or --log-level adjusts it below
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "wordharvest", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&cli.config_path)?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Extract { input, track, output, .. } => {
            let written = controller.extract(&input, track, output).await?;
            info!("Success: {:?}", written);
        }
        Commands::Batch { inputs, output } => {
            let report = controller.batch(&inputs, output.clone()).await?;
            if !report.errors.is_empty() {
                warn!("{} file(s) failed:", report.errors.len());
                for (path, failure) in &report.errors {
                    warn!("  {}: {}", path.display(), failure);
                }
            }
            info!("Success: {:?} ({} of {} files)", output, report.succeeded, report.succeeded + report.failed());
        }
        Commands::Match {
            baseline,
            comparison,
            literal,
            output,
        } => {
            let mode = MatchMode::from_use_lemma(!literal);
            controller.match_files(&baseline, &comparison, mode, &output)?;
        }
        Commands::Filter {
            vocabulary,
            excludes,
            output,
        } => {
            let output = output.unwrap_or_else(|| vocabulary.clone());
            controller.filter_file(&vocabulary, &excludes, &output)?;
        }
        Commands::Lookup { word } => match controller.lookup(&word)? {
            Some(entry) => {
                println!("{} [{}]", entry.value, entry.ukphone);
                if !entry.definition.is_empty() {
                    println!("{}", entry.definition);
                }
                if !entry.translation.is_empty() {
                    println!("{}", entry.translation);
                }
                println!("bnc: {}  frq: {}  exchange: {}", entry.bnc_rank(), entry.frq_rank(), entry.exchange);
                println!("{}", controller.dictionary_stats()?);
            }
            None => return Err(anyhow!("'{}' is not in the dictionary", word)),
        },
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        Ok(config)
    }
}

fn apply_overrides(config: &mut Config, cli: &CommandLineOptions) {
    if let Some(dictionary) = &cli.dictionary {
        config.dictionary_path = dictionary.to_string_lossy().into_owned();
    }

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }

    if let Commands::Extract {
        no_phrases,
        sentence_length,
        transcoder,
        ..
    } = &cli.command
    {
        if *no_phrases {
            config.extraction.enable_phrases = false;
        }
        if let Some(length) = sentence_length {
            config.extraction.sentence_length = *length;
        }
        if let Some(kind) = transcoder {
            config.media.transcoder = kind.clone().into();
        }
    }
}

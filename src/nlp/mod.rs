/*!
 * Natural-language collaborators used by the extraction pipeline.
 *
 * Each model is a trait so callers can plug in statistical models. The
 * built-in implementations are rule and lexicon based, built once from
 * embedded tables and pure functions of their input afterwards.
 */

use std::ops::Range;
use std::sync::Arc;

use crate::vocabulary::Word;

pub mod chunker;
pub mod language;
pub mod lemmatizer;
pub mod segmenter;
pub mod tagger;
pub mod tokenizer;

pub use chunker::RuleChunker;
pub use language::StopwordLanguageDetector;
pub use lemmatizer::{lemma_from_exchange, ExchangeLemmatizer};
pub use segmenter::RuleSentenceSegmenter;
pub use tagger::RuleBasedTagger;
pub use tokenizer::RuleTokenizer;

/// Splits raw text into sentences
pub trait SentenceSegmenter: Send + Sync {
    /// Byte ranges of the sentences; together they cover `text` exactly,
    /// in order, without overlap
    fn sentence_spans(&self, text: &str) -> Vec<Range<usize>>;

    /// Trimmed sentence texts, one per span (empty sentences included)
    fn segment(&self, text: &str) -> Vec<String> {
        self.sentence_spans(text)
            .into_iter()
            .map(|span| text[span].trim().to_string())
            .collect()
    }
}

/// Splits a sentence into word tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Vec<String>;
}

/// Assigns one part-of-speech tag per token
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Groups tagged tokens into phrase chunks
pub trait PhraseChunker: Send + Sync {
    /// One BIO chunk tag (`B-NP`, `I-NP`, `O`, ...) per token
    fn chunk(&self, tokens: &[String], tags: &[String]) -> Vec<String>;

    /// Token index ranges of the chunks
    fn chunk_ranges(&self, tokens: &[String], tags: &[String]) -> Vec<Range<usize>> {
        bio_ranges(&self.chunk(tokens, tags))
    }

    /// Chunk texts, tokens joined with single spaces
    fn chunk_spans(&self, tokens: &[String], tags: &[String]) -> Vec<String> {
        self.chunk_ranges(tokens, tags)
            .into_iter()
            .map(|range| tokens[range].join(" "))
            .collect()
    }
}

/// Group BIO tags into token ranges. An `I-` tag that does not continue a
/// chunk of the same type starts a new one.
pub fn bio_ranges(chunk_tags: &[String]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut current: Option<(usize, &str)> = None;

    for (i, tag) in chunk_tags.iter().enumerate() {
        let (prefix, kind) = match tag.split_once('-') {
            Some((prefix, kind)) => (prefix, kind),
            None => ("O", ""),
        };

        let continues = prefix == "I" && matches!(current, Some((_, k)) if k == kind);
        if continues {
            continue;
        }

        if let Some((start, _)) = current.take() {
            ranges.push(start..i);
        }
        if prefix == "B" || prefix == "I" {
            current = Some((i, kind));
        }
    }

    if let Some((start, _)) = current {
        ranges.push(start..chunk_tags.len());
    }

    ranges
}

/// A language guess with its confidence in `0.0..=1.0`
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePrediction {
    /// ISO 639-3 code, e.g. `eng`
    pub lang: String,
    pub confidence: f64,
}

/// Guesses the language of a text sample
pub trait LanguageDetector: Send + Sync {
    fn predict(&self, text: &str) -> Option<LanguagePrediction>;
}

/// Maps a dictionary word to its canonical lemma
pub trait Lemmatizer: Send + Sync {
    fn lemma(&self, word: &Word) -> String;
}

/// The set of models one pipeline run uses; shared read-only
#[derive(Clone)]
pub struct NlpModels {
    pub segmenter: Arc<dyn SentenceSegmenter>,
    pub tokenizer: Arc<dyn Tokenizer>,
    pub tagger: Arc<dyn PosTagger>,
    pub chunker: Arc<dyn PhraseChunker>,
    pub detector: Arc<dyn LanguageDetector>,
    pub lemmatizer: Arc<dyn Lemmatizer>,
}

impl NlpModels {
    /// The built-in rule and lexicon models
    pub fn rule_based() -> Self {
        Self {
            segmenter: Arc::new(RuleSentenceSegmenter::new()),
            tokenizer: Arc::new(RuleTokenizer::new()),
            tagger: Arc::new(RuleBasedTagger::new()),
            chunker: Arc::new(RuleChunker::new()),
            detector: Arc::new(StopwordLanguageDetector::new()),
            lemmatizer: Arc::new(ExchangeLemmatizer),
        }
    }

    /// Replace the language detector
    pub fn with_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the lemmatizer
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }
}

impl Default for NlpModels {
    fn default() -> Self {
        Self::rule_based()
    }
}

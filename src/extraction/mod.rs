/*!
 * Candidate extraction and citation collection.
 *
 * A unit of text (a document sentence or one caption) is tokenized,
 * optionally chunked into phrases, and every surviving candidate receives a
 * clipped citation of that unit.
 */

pub mod candidates;
pub mod citations;
pub mod context;

pub use candidates::{extract_candidates, is_punctuation, trim_edge_punctuation, SentenceCandidates, PUNCTUATION};
pub use citations::{normalize_line_breaks, CitationMap};
pub use context::{clip_by_characters, clip_sentence, clip_tokenized};

use crate::nlp::NlpModels;
use crate::vocabulary::Caption;

/// Default citation window, in tokens
pub const DEFAULT_SENTENCE_LENGTH: usize = 25;

/// Per-run extraction parameters
#[derive(Debug, Clone, Copy)]
pub struct ExtractionOptions {
    /// Add phrase chunks to the token candidates
    pub enable_phrases: bool,
    /// Citation window in tokens
    pub sentence_length: usize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            enable_phrases: true,
            sentence_length: DEFAULT_SENTENCE_LENGTH,
        }
    }
}

impl From<&crate::app_config::ExtractionConfig> for ExtractionOptions {
    fn from(config: &crate::app_config::ExtractionConfig) -> Self {
        Self {
            enable_phrases: config.enable_phrases,
            sentence_length: config.sentence_length,
        }
    }
}

/// Register a citation for every candidate of one text unit. `start` and
/// `end` are the unit's timing, empty for document sentences.
pub fn collect_unit(
    models: &NlpModels,
    options: &ExtractionOptions,
    citations: &mut CitationMap,
    text: &str,
    start: &str,
    end: &str,
) -> usize {
    let unit = extract_candidates(models, text, options.enable_phrases);
    for candidate in &unit.candidates {
        let clipped = clip_tokenized(&unit.tokens, candidate, text, options.sentence_length);
        citations.register(candidate, Caption::new(start, end, clipped));
    }
    unit.candidates.len()
}

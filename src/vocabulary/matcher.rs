/*!
 * Literal and lemma-based intersection of two vocabularies.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::model::{Vocabulary, Word, WordKey};
use crate::nlp::Lemmatizer;

/// How two words are considered the same
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Same canonical key
    Literal,
    /// Same lemma
    Lemma,
}

impl MatchMode {
    pub fn from_use_lemma(use_lemma: bool) -> Self {
        if use_lemma { Self::Lemma } else { Self::Literal }
    }
}

/// Computes which baseline words also occur in a comparison vocabulary
#[derive(Clone)]
pub struct VocabularyMatcher {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl VocabularyMatcher {
    pub fn new(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// Build a new vocabulary of baseline words found in `comparison`.
    ///
    /// Neither input is modified. Provenance fields are copied from the
    /// baseline. In lemma mode, baseline words sharing a lemma resolve to the
    /// last one in baseline order.
    pub fn match_vocabularies(&self, baseline: &Vocabulary, comparison: &Vocabulary, mode: MatchMode) -> Vocabulary {
        let words = match mode {
            MatchMode::Literal => Self::literal_matches(baseline, comparison),
            MatchMode::Lemma => self.lemma_matches(baseline, comparison),
        };

        debug!(
            "Matched {} of {} baseline words against '{}' ({:?})",
            words.len(),
            baseline.size(),
            comparison.name,
            mode
        );

        let mut result = Vocabulary::new(baseline.name.clone(), baseline.vocabulary_type, baseline.language.clone())
            .with_video(baseline.relate_video_path.clone(), baseline.subtitles_track_id);
        result.set_words(words);
        result
    }

    fn literal_matches(baseline: &Vocabulary, comparison: &Vocabulary) -> Vec<Word> {
        let wanted: HashSet<WordKey> = comparison.words().iter().map(Word::key).collect();
        baseline
            .words()
            .iter()
            .filter(|word| wanted.contains(&word.key()))
            .cloned()
            .collect()
    }

    fn lemma_matches(&self, baseline: &Vocabulary, comparison: &Vocabulary) -> Vec<Word> {
        let mut by_lemma: HashMap<String, &Word> = HashMap::with_capacity(baseline.size());
        for word in baseline.words() {
            by_lemma.insert(self.lemmatizer.lemma(word), word);
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut words = Vec::new();
        for word in comparison.words() {
            let lemma = self.lemmatizer.lemma(word);
            if !seen.insert(lemma.clone()) {
                continue;
            }
            if let Some(found) = by_lemma.get(&lemma) {
                words.push((*found).clone());
            }
        }
        words
    }
}

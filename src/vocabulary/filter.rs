/*!
 * Post-extraction vocabulary filtering.
 *
 * Drops numbers and words outside the configured frequency bands, can fold
 * derived forms into their dictionary lemma, and removes words already
 * present in other vocabularies.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};

use super::model::{Vocabulary, Word, WordKey};
use crate::app_config::FilterConfig;
use crate::dictionary::Dictionary;
use crate::errors::DictionaryError;
use crate::nlp::Lemmatizer;

/// Applies `FilterConfig` rules to word lists
#[derive(Clone)]
pub struct VocabularyFilter {
    dictionary: Arc<dyn Dictionary>,
    lemmatizer: Arc<dyn Lemmatizer>,
    options: FilterConfig,
}

impl VocabularyFilter {
    pub fn new(dictionary: Arc<dyn Dictionary>, lemmatizer: Arc<dyn Lemmatizer>, options: FilterConfig) -> Self {
        Self {
            dictionary,
            lemmatizer,
            options,
        }
    }

    /// Whether the frequency and number rules reject this word
    pub fn is_rejected(&self, word: &Word) -> bool {
        let o = &self.options;
        let in_band = |rank: i32, threshold: Option<i32>| matches!(threshold, Some(t) if rank >= 1 && rank < t);

        (o.filter_numbers && word.value.trim().parse::<f64>().is_ok())
            || in_band(word.bnc_rank(), o.bnc_threshold)
            || in_band(word.frq_rank(), o.frq_threshold)
            || (o.filter_bnc_zero && word.bnc_rank() == 0)
            || (o.filter_frq_zero && word.frq_rank() == 0)
    }

    /// Filter a word list, keeping its order
    pub fn filter_words(&self, words: &[Word]) -> Result<Vec<Word>, DictionaryError> {
        let mut kept: Vec<Word> = words.iter().filter(|w| !self.is_rejected(w)).cloned().collect();
        debug!("Frequency filter kept {} of {} words", kept.len(), words.len());

        if self.options.replace_to_lemma {
            self.replace_with_lemmas(words, &mut kept)?;
        }

        Ok(kept)
    }

    /// Filter a vocabulary into a new one with the same provenance
    pub fn filter_vocabulary(&self, vocabulary: &Vocabulary) -> Result<Vocabulary, DictionaryError> {
        let words = self.filter_words(vocabulary.words())?;
        let mut result = Vocabulary::new(vocabulary.name.clone(), vocabulary.vocabulary_type, vocabulary.language.clone())
            .with_video(vocabulary.relate_video_path.clone(), vocabulary.subtitles_track_id);
        result.set_words(words);
        info!("Filtered '{}': {} -> {} words", vocabulary.name, vocabulary.size(), result.size());
        Ok(result)
    }

    /// Replace derived forms in `kept` with their dictionary lemma.
    ///
    /// Citations of every form of a lemma (filtered or not) are merged onto
    /// the lemma, up to the citation cap. The lemma takes the position of the
    /// first form it replaces.
    fn replace_with_lemmas(&self, all_words: &[Word], kept: &mut Vec<Word>) -> Result<(), DictionaryError> {
        let mut derived: Vec<(WordKey, String)> = Vec::new();
        let mut carriers: HashMap<String, Word> = HashMap::new();
        let mut lemma_order: Vec<String> = Vec::new();

        for word in all_words {
            let lemma = self.lemmatizer.lemma(word);
            if lemma.is_empty() || lemma == word.key().as_str() {
                continue;
            }
            derived.push((word.key(), lemma.clone()));
            carriers
                .entry(lemma.clone())
                .or_insert_with(|| {
                    lemma_order.push(lemma.clone());
                    Word::new(lemma.clone())
                })
                .merge_citations_from(word);
        }

        if derived.is_empty() {
            return Ok(());
        }

        let mut valid: HashMap<String, Word> = HashMap::new();
        for mut lemma_word in self.dictionary.query_batch(&lemma_order)? {
            let key = lemma_word.key().into_string();
            if let Some(carrier) = carriers.get(&key) {
                lemma_word.captions = carrier.captions.clone();
                lemma_word.external_captions = carrier.external_captions.clone();
                valid.insert(key, lemma_word);
            }
        }

        let mut replaced = 0usize;
        for (key, lemma) in derived {
            let Some(index) = kept.iter().position(|w| w.key() == key) else {
                continue;
            };
            let Some(lemma_word) = valid.get(&lemma) else {
                continue;
            };

            kept.remove(index);
            replaced += 1;

            let lemma_key = lemma_word.key();
            if let Some(existing) = kept.iter_mut().find(|w| w.key() == lemma_key) {
                existing.merge_citations_from(lemma_word);
            } else if !self.is_rejected(lemma_word) {
                kept.insert(index, lemma_word.clone());
            }
        }

        debug!("Replaced {} derived forms with lemmas", replaced);
        Ok(())
    }
}

/// Remove every word that appears in at least one of `others`
pub fn exclude_known(words: Vec<Word>, others: &[Vocabulary]) -> Vec<Word> {
    let known: HashSet<WordKey> = others
        .iter()
        .flat_map(|v| v.words().iter().map(Word::key))
        .collect();
    words.into_iter().filter(|w| !known.contains(&w.key())).collect()
}

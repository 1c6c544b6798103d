/*!
 * Dictionary validation of collected candidates.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::dictionary::Dictionary;
use crate::errors::DictionaryError;
use crate::extraction::CitationMap;
use crate::vocabulary::{Word, WordKey};

/// Keeps only dictionary words and attaches their citations
#[derive(Clone)]
pub struct DictionaryValidator {
    dictionary: Arc<dyn Dictionary>,
}

impl DictionaryValidator {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        Self { dictionary }
    }

    /// Look every collected key up in one batch. Misses are dropped
    /// silently; hits come back in discovery order carrying their citations.
    pub fn validate(&self, citations: &CitationMap) -> Result<Vec<Word>, DictionaryError> {
        if citations.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.dictionary.query_batch(&citations.key_strings())?;
        let mut by_key: HashMap<WordKey, Word> = HashMap::with_capacity(found.len());
        for word in found {
            by_key.entry(word.key()).or_insert(word);
        }

        let mut words = Vec::with_capacity(by_key.len());
        for key in citations.keys() {
            let Some(mut word) = by_key.remove(key) else {
                continue;
            };
            for caption in citations.get(key).unwrap_or_default() {
                word.push_caption(caption.clone());
            }
            if word.citation_count() > 0 {
                words.push(word);
            }
        }

        debug!("{} of {} candidates found in the dictionary", words.len(), citations.len());
        Ok(words)
    }
}

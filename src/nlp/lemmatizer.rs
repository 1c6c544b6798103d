/*!
 * Dictionary `exchange` based lemmatizer.
 *
 * ECDICT stores inflections as `type:form` pairs separated by `/`
 * (`p:went/d:gone/i:going/3:goes`); the `0` entry names the lemma of a
 * derived form (`0:go/1:p`).
 */

use super::Lemmatizer;
use crate::vocabulary::Word;

/// The lemma recorded in an `exchange` field, if any
pub fn lemma_from_exchange(exchange: &str) -> Option<&str> {
    exchange
        .split('/')
        .filter_map(|pair| pair.split_once(':'))
        .find(|(kind, _)| kind.trim() == "0")
        .map(|(_, form)| form.trim())
        .filter(|form| !form.is_empty())
}

/// Lemmatizer reading the `0:` entry of a word's exchange data
#[derive(Debug, Default, Clone, Copy)]
pub struct ExchangeLemmatizer;

impl Lemmatizer for ExchangeLemmatizer {
    fn lemma(&self, word: &Word) -> String {
        match lemma_from_exchange(&word.exchange) {
            Some(lemma) => lemma.to_lowercase(),
            None => word.key().into_string(),
        }
    }
}

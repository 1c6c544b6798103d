/*!
 * Per-word citation collection.
 */

use std::collections::HashMap;

use crate::vocabulary::{Caption, WordKey, MAX_CITATIONS};

/// Citations per lowercased word key, in first-discovery order
#[derive(Debug, Default, Clone)]
pub struct CitationMap {
    order: Vec<WordKey>,
    citations: HashMap<WordKey, Vec<Caption>>,
}

impl CitationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a citation for `word`. Keys with `.` or `_` register the same
    /// citation under each delimited part as well.
    pub fn register(&mut self, word: &str, citation: Caption) {
        let citation = Caption {
            content: normalize_line_breaks(&citation.content),
            ..citation
        };

        let key = WordKey::new(word);
        let parts = delimited_parts(key.as_str());
        self.register_key(key, citation.clone());
        for part in parts {
            self.register_key(WordKey::new(&part), citation.clone());
        }
    }

    fn register_key(&mut self, key: WordKey, citation: Caption) {
        match self.citations.get_mut(&key) {
            Some(list) => {
                if list.len() < MAX_CITATIONS && !list.contains(&citation) {
                    list.push(citation);
                }
            }
            None => {
                self.order.push(key.clone());
                self.citations.insert(key, vec![citation]);
            }
        }
    }

    /// Keys in first-discovery order
    pub fn keys(&self) -> &[WordKey] {
        &self.order
    }

    /// Citations registered for a key
    pub fn get(&self, key: &WordKey) -> Option<&[Caption]> {
        self.citations.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys as plain strings, for dictionary lookup
    pub fn key_strings(&self) -> Vec<String> {
        self.order.iter().map(|k| k.as_str().to_string()).collect()
    }
}

/// Sub-parts of a dotted or underscored identifier: `a.b_c` yields `a`,
/// `b_c`, `b` and `c`.
///
/// Underscore pieces are taken from each dotted part as well, so the plain
/// words inside a snake_case member of a dotted path (`update`, `state` in
/// `player.update_state`) are validated against the dictionary on their own.
fn delimited_parts(key: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut push = |part: &str| {
        if !part.is_empty() && part != key && !parts.iter().any(|p| p == part) {
            parts.push(part.to_string());
        }
    };

    for dotted in key.split('.') {
        push(dotted);
        if dotted.contains('_') {
            for piece in dotted.split('_') {
                push(piece);
            }
        }
    }
    parts
}

/// Replace every line break (CRLF, CR or LF) with a single space
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

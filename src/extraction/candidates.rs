/*!
 * Vocabulary candidates for one sentence: tokens plus, optionally, phrase
 * chunks, cleaned of punctuation.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::NlpModels;

/// Candidates that are nothing but punctuation
pub const PUNCTUATION: &[&str] = &[
    "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".", "/", ":", ";", "<", "=",
    ">", "?", "@", "[", "\\", "]", "^", "_", "`", "{", "|", "}", "~", "...", "--", "''", "``",
    "。", "，", "、", "；", "：", "？", "！", "…", "—", "–", "·", "“", "”", "‘", "’", "「", "」",
    "『", "』", "（", "）", "【", "】", "《", "》", "〈", "〉", "«", "»",
];

static GON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bgon\b").unwrap());
static NA_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bna\b").unwrap());

fn is_punctuation_char(c: char) -> bool {
    c.is_ascii_punctuation() || PUNCTUATION.iter().any(|p| p.chars().eq(std::iter::once(c)))
}

/// Whether a candidate is pure punctuation
pub fn is_punctuation(candidate: &str) -> bool {
    PUNCTUATION.contains(&candidate) || (!candidate.is_empty() && candidate.chars().all(is_punctuation_char))
}

/// Trim at most one punctuation character from each end
pub fn trim_edge_punctuation(candidate: &str) -> &str {
    let mut s = candidate.trim();
    if let Some(c) = s.chars().next().filter(|c| is_punctuation_char(*c)) {
        s = &s[c.len_utf8()..];
    }
    if let Some(c) = s.chars().next_back().filter(|c| is_punctuation_char(*c)) {
        s = &s[..s.len() - c.len_utf8()];
    }
    s.trim()
}

/// Insertion-ordered string set
#[derive(Debug, Default, Clone)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, item: &str) -> bool {
        if !self.seen.remove(item) {
            return false;
        }
        self.items.retain(|i| i != item);
        true
    }

    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Tokens of a sentence and the candidates derived from them
#[derive(Debug, Clone, Default)]
pub struct SentenceCandidates {
    pub tokens: Vec<String>,
    pub candidates: Vec<String>,
}

/// Extract the candidate set of one sentence
pub fn extract_candidates(models: &NlpModels, sentence: &str, enable_phrases: bool) -> SentenceCandidates {
    let tokens = models.tokenizer.tokenize(sentence);

    let mut raw = OrderedSet::new();
    for token in &tokens {
        raw.insert(token.clone());
    }

    if enable_phrases && !tokens.is_empty() {
        let tags = models.tagger.tag(&tokens);
        for phrase in models.chunker.chunk_spans(&tokens, &tags) {
            raw.insert(phrase);
        }
    }

    rejoin_gonna(&mut raw, &tokens, sentence);

    let mut candidates = OrderedSet::new();
    for candidate in raw.iter() {
        let trimmed = trim_edge_punctuation(candidate);
        if trimmed.is_empty() || is_punctuation(trimmed) {
            continue;
        }
        candidates.insert(trimmed);
    }

    SentenceCandidates {
        tokens,
        candidates: candidates.into_vec(),
    }
}

/// Undo the tokenizer's `gonna` -> `gon` + `na` split when neither half
/// occurs as a word of its own in the source text
fn rejoin_gonna(raw: &mut OrderedSet, tokens: &[String], source: &str) {
    let Some(i) = tokens
        .windows(2)
        .position(|w| w[0].eq_ignore_ascii_case("gon") && w[1].eq_ignore_ascii_case("na"))
    else {
        return;
    };

    if GON_WORD.is_match(source) || NA_WORD.is_match(source) {
        return;
    }

    let joined = format!("{}{}", tokens[i], tokens[i + 1]);
    let fixed: Vec<(String, String)> = raw
        .iter()
        .filter(|c| c.contains(' '))
        .filter_map(|c| {
            let words: Vec<&str> = c.split(' ').collect();
            let has_pair = words
                .windows(2)
                .any(|w| w[0].eq_ignore_ascii_case("gon") && w[1].eq_ignore_ascii_case("na"));
            has_pair.then(|| (c.clone(), merge_gonna(&words)))
        })
        .collect();

    for token in tokens.iter().filter(|t| t.eq_ignore_ascii_case("gon") || t.eq_ignore_ascii_case("na")) {
        raw.remove(token);
    }
    raw.insert(joined);
    for (old, new) in fixed {
        raw.remove(&old);
        raw.insert(new);
    }
}

fn merge_gonna(words: &[&str]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        if i + 1 < words.len() && words[i].eq_ignore_ascii_case("gon") && words[i + 1].eq_ignore_ascii_case("na") {
            out.push(format!("{}{}", words[i], words[i + 1]));
            i += 2;
        } else {
            out.push(words[i].to_string());
            i += 1;
        }
    }
    out.join(" ")
}

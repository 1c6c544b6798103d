/*!
 * Rule-based sentence boundary detection.
 */

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;

use super::SentenceSegmenter;

/// Lowercased abbreviations (without the final period) that do not end a sentence
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "e.g", "i.e", "inc",
        "ltd", "co", "corp", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
        "nov", "dec", "no", "fig", "approx", "dept", "est", "gen", "gov", "sgt", "capt", "col",
        "lt", "rev", "u.s", "u.k", "a.m", "p.m",
    ]
    .into_iter()
    .collect()
});

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_cjk_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '”' | '’' | '」' | '』' | '）')
}

/// Sentence segmenter driven by terminal punctuation and blank lines
#[derive(Debug, Default, Clone)]
pub struct RuleSentenceSegmenter;

impl RuleSentenceSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Whether the period at `dot` closes an abbreviation or an initial
    fn is_abbreviation(text: &str, dot: usize) -> bool {
        let word_start = text[..dot]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace() || matches!(c, '(' | '"' | '“'))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = text[word_start..dot].to_lowercase();

        if word.is_empty() {
            return false;
        }
        if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
            return true;
        }
        ABBREVIATIONS.contains(word.as_str())
    }
}

impl SentenceSegmenter for RuleSentenceSegmenter {
    fn sentence_spans(&self, text: &str) -> Vec<Range<usize>> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut spans = Vec::new();
        let mut start = 0;
        let mut i = 0;

        // Byte offset of the char at index `k`, or the end of text
        let offset = |k: usize| chars.get(k).map(|(b, _)| *b).unwrap_or(text.len());

        while i < chars.len() {
            let (byte, c) = chars[i];

            if c == '\n' {
                let mut j = i + 1;
                let mut newlines = 1;
                while j < chars.len() && chars[j].1.is_whitespace() {
                    if chars[j].1 == '\n' {
                        newlines += 1;
                    }
                    j += 1;
                }
                if newlines >= 2 && j < chars.len() {
                    spans.push(start..offset(j));
                    start = offset(j);
                }
                i = j;
                continue;
            }

            if is_cjk_terminator(c) {
                let mut j = i + 1;
                while j < chars.len() && (is_cjk_terminator(chars[j].1) || is_closing(chars[j].1)) {
                    j += 1;
                }
                while j < chars.len() && chars[j].1.is_whitespace() {
                    j += 1;
                }
                if j < chars.len() {
                    spans.push(start..offset(j));
                    start = offset(j);
                }
                i = j;
                continue;
            }

            if is_terminator(c) {
                let mut j = i + 1;
                while j < chars.len() && (is_terminator(chars[j].1) || is_closing(chars[j].1)) {
                    j += 1;
                }

                let followed_by_space = j < chars.len() && chars[j].1.is_whitespace();
                let single_dot = c == '.' && j == i + 1;
                if !followed_by_space || (single_dot && Self::is_abbreviation(text, byte)) {
                    i = j;
                    continue;
                }

                let mut k = j;
                while k < chars.len() && chars[k].1.is_whitespace() {
                    k += 1;
                }
                if k < chars.len() && !chars[k].1.is_lowercase() {
                    spans.push(start..offset(k));
                    start = offset(k);
                }
                i = k;
                continue;
            }

            i += 1;
        }

        if start < text.len() {
            spans.push(start..text.len());
        }

        spans
    }
}

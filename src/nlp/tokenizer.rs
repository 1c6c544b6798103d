/*!
 * Rule-based word tokenizer.
 *
 * Splits on whitespace, then peels punctuation off both ends of each chunk.
 * Apostrophe contractions and inner `.`/`_` are kept, so `you're` and
 * `player.update_state` stay whole. `gonna` is split into `gon` + `na`
 * as treebank tokenizers do.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::Tokenizer;

/// Lowercased abbreviations that keep their final period
static KEEP_PERIOD: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "mt.", "vs.", "etc.", "inc.",
        "ltd.", "co.", "corp.", "no.", "fig.", "approx.", "dept.", "gen.", "sgt.", "capt.", "col.",
        "lt.", "rev.",
    ]
    .into_iter()
    .collect()
});

fn is_leading_punct(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '(' | '[' | '{' | '<' | '“' | '‘' | '«' | '¿' | '¡' | '「' | '『' | '（' | '【' | '《' | '〈'
    )
}

fn is_trailing_punct(c: char) -> bool {
    matches!(
        c,
        ',' | ';' | ':' | '!' | '?' | '"' | '\'' | ')' | ']' | '}' | '>' | '”' | '’' | '»' | '…'
            | '。' | '，' | '！' | '？' | '；' | '：' | '、' | '」' | '』' | '）' | '】' | '》' | '〉'
    )
}

fn is_dash(c: char) -> bool {
    matches!(c, '—' | '–')
}

/// Whitespace and punctuation tokenizer
#[derive(Debug, Default, Clone)]
pub struct RuleTokenizer;

impl RuleTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn push_core(tokens: &mut Vec<String>, core: &str) {
        if core.is_empty() {
            return;
        }

        // Split on em/en dashes and double hyphens
        let mut rest = core;
        while !rest.is_empty() {
            let dash = rest
                .char_indices()
                .find(|(i, c)| is_dash(*c) || rest[*i..].starts_with("--"));
            match dash {
                Some((i, c)) => {
                    Self::push_word(tokens, &rest[..i]);
                    let len = if c == '-' { 2 } else { c.len_utf8() };
                    tokens.push(rest[i..i + len].to_string());
                    rest = &rest[i + len..];
                }
                None => {
                    Self::push_word(tokens, rest);
                    break;
                }
            }
        }
    }

    fn push_word(tokens: &mut Vec<String>, word: &str) {
        if word.is_empty() {
            return;
        }
        if word.len() == 5 && word.eq_ignore_ascii_case("gonna") {
            tokens.push(word[..3].to_string());
            tokens.push(word[3..].to_string());
            return;
        }
        tokens.push(word.to_string());
    }

    fn tokenize_chunk(tokens: &mut Vec<String>, chunk: &str) {
        let mut start = 0;
        let mut end = chunk.len();

        let mut leading = Vec::new();
        while let Some(c) = chunk[start..end].chars().next() {
            if !is_leading_punct(c) {
                break;
            }
            leading.push(c.to_string());
            start += c.len_utf8();
        }

        let mut trailing = Vec::new();
        while start < end {
            let body = &chunk[start..end];
            if body.ends_with("...") && body.len() > 3 {
                trailing.push("...".to_string());
                end -= 3;
                continue;
            }
            let Some(c) = body.chars().next_back() else {
                break;
            };
            if c == '.' {
                let lowered = body.to_lowercase();
                let inner_dot = body[..body.len() - 1].contains('.');
                if body.len() == 1 || (!KEEP_PERIOD.contains(lowered.as_str()) && !inner_dot) {
                    trailing.push(".".to_string());
                    end -= 1;
                    continue;
                }
                break;
            }
            if is_trailing_punct(c) {
                // Keep a trailing apostrophe on plural possessives like "dogs'"
                if c == '\'' && body.len() > 1 && body[..body.len() - 1].ends_with(['s', 'S']) {
                    break;
                }
                trailing.push(c.to_string());
                end -= c.len_utf8();
                continue;
            }
            break;
        }

        tokens.extend(leading);
        Self::push_core(tokens, &chunk[start..end]);
        tokens.extend(trailing.into_iter().rev());
    }
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in sentence.split_whitespace() {
            Self::tokenize_chunk(&mut tokens, chunk);
        }
        tokens
    }
}

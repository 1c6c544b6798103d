/*!
 * Citation windows around a word or phrase.
 */

use crate::nlp::Tokenizer;

/// Clip `sentence` to a window of about `max_len` tokens around `word`.
///
/// Sentences of at most `max_len` tokens are returned unchanged. A word
/// found as a single token gets the token window `[i - max_len/2,
/// i + max_len/2)`, clamped and joined with single spaces. Anything else
/// (usually a multi-token phrase) is located in the whitespace-normalized
/// sentence and clipped by counting whitespace boundaries outwards from the
/// start of the match.
pub fn clip_sentence(tokenizer: &dyn Tokenizer, word: &str, sentence: &str, max_len: usize) -> String {
    clip_tokenized(&tokenizer.tokenize(sentence), word, sentence, max_len)
}

/// `clip_sentence` over tokens the caller already has
pub fn clip_tokenized(tokens: &[String], word: &str, sentence: &str, max_len: usize) -> String {
    if tokens.len() <= max_len {
        return sentence.to_string();
    }

    let half = (max_len / 2).max(1);

    let index = tokens
        .iter()
        .position(|t| t == word)
        .or_else(|| tokens.iter().position(|t| t.eq_ignore_ascii_case(word)));

    match index {
        Some(i) => {
            let start = i.saturating_sub(half);
            let end = (i + half).min(tokens.len());
            tokens[start..end].join(" ")
        }
        None => clip_by_characters(word, sentence, half),
    }
}

/// Character-scan window: from the start of the match, walk left until
/// `half` spaces have been crossed and right until the `half`-th space.
/// Spaces inside the phrase count towards the right side.
pub fn clip_by_characters(phrase: &str, sentence: &str, half: usize) -> String {
    let normalized = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");

    let found = normalized.find(&phrase).or_else(|| {
        normalized
            .to_ascii_lowercase()
            .find(&phrase.to_ascii_lowercase())
    });
    let Some(start) = found.filter(|_| !phrase.is_empty()) else {
        return normalized;
    };

    let bytes = normalized.as_bytes();

    let mut left = 0;
    let mut crossed = 0;
    for i in (0..start).rev() {
        if bytes[i] == b' ' {
            crossed += 1;
            if crossed == half {
                left = i + 1;
                break;
            }
        }
    }

    let mut right = normalized.len();
    let mut crossed = 0;
    for (i, b) in bytes.iter().enumerate().skip(start) {
        if *b == b' ' {
            crossed += 1;
            if crossed == half {
                right = i;
                break;
            }
        }
    }

    normalized[left..right].to_string()
}

/*!
 * Script and stopword based language identification.
 *
 * Non-Latin scripts are recognized by Unicode block. Latin-script text is
 * scored against small stopword profiles; the profile with the most hits wins.
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;

use super::{LanguageDetector, LanguagePrediction};

type Profile = (&'static str, HashSet<&'static str>);

static PROFILES: Lazy<Vec<Profile>> = Lazy::new(|| {
    let raw: &[(&str, &[&str])] = &[
        ("eng", &["the", "and", "is", "are", "you", "to", "of", "it", "that", "in", "what", "was", "this", "have", "for", "with", "not", "be", "we", "they", "he", "she", "my", "your", "do", "don't", "i'm", "it's", "there", "just", "know", "can", "will", "would", "me", "at", "on", "all", "so", "but", "if", "no", "yes", "oh", "here", "now", "get", "go", "right", "about", "well", "how", "why", "who", "where"]),
        ("fra", &["le", "la", "les", "et", "est", "vous", "je", "tu", "il", "elle", "nous", "une", "un", "des", "que", "qui", "pas", "ne", "ce", "c'est", "dans", "pour", "sur", "avec", "mais", "oui", "non", "mon", "ma", "moi", "toi", "du", "au", "suis", "ça", "j'ai", "bien", "très", "où", "sont"]),
        ("deu", &["der", "die", "das", "und", "ist", "nicht", "ich", "du", "sie", "wir", "ein", "eine", "zu", "mit", "auf", "für", "den", "dem", "es", "was", "wie", "aber", "ja", "nein", "mein", "dein", "bin", "hast", "sind", "auch", "noch", "hier", "wo", "warum", "kann", "habe", "haben"]),
        ("spa", &["el", "la", "los", "las", "y", "es", "que", "de", "en", "un", "una", "no", "por", "para", "con", "pero", "está", "estoy", "qué", "yo", "tú", "usted", "mi", "su", "se", "lo", "sí", "muy", "aquí", "dónde", "cómo", "hay", "eso", "esto", "bien", "son"]),
        ("ita", &["il", "lo", "la", "gli", "le", "e", "è", "che", "di", "un", "una", "non", "per", "con", "ma", "sono", "sei", "io", "tu", "lui", "lei", "noi", "mio", "questo", "quello", "qui", "dove", "perché", "come", "bene", "grazie", "ciao", "del", "della"]),
        ("por", &["o", "a", "os", "as", "e", "é", "que", "de", "em", "um", "uma", "não", "para", "com", "mas", "eu", "você", "ele", "ela", "nós", "meu", "minha", "isso", "isto", "aqui", "onde", "como", "bem", "obrigado", "sim", "do", "da", "está", "estou"]),
        ("nld", &["de", "het", "een", "en", "is", "niet", "ik", "je", "jij", "hij", "zij", "wij", "van", "op", "te", "dat", "die", "met", "voor", "maar", "ja", "nee", "mijn", "hier", "waar", "waarom", "hoe", "wat", "zijn", "ben", "heb"]),
    ];

    raw.iter()
        .map(|(lang, words)| (*lang, words.iter().copied().collect()))
        .collect()
});

/// Language detector for caption samples
#[derive(Debug, Default, Clone)]
pub struct StopwordLanguageDetector;

impl StopwordLanguageDetector {
    pub fn new() -> Self {
        Self
    }

    fn script_language(text: &str) -> Option<LanguagePrediction> {
        let mut kana = 0usize;
        let mut hangul = 0usize;
        let mut han = 0usize;
        let mut cyrillic = 0usize;
        let mut arabic = 0usize;
        let mut letters = 0usize;

        for c in text.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            match c as u32 {
                0x3040..=0x30FF => kana += 1,
                0xAC00..=0xD7AF | 0x1100..=0x11FF => hangul += 1,
                0x4E00..=0x9FFF | 0x3400..=0x4DBF => han += 1,
                0x0400..=0x04FF => cyrillic += 1,
                0x0600..=0x06FF => arabic += 1,
                _ => {}
            }
        }

        if letters == 0 {
            return None;
        }

        let ratio = |count: usize| count as f64 / letters as f64;
        let (lang, count) = if kana > 0 {
            ("jpn", kana + han)
        } else if hangul > 0 {
            ("kor", hangul)
        } else if han > 0 {
            ("zho", han)
        } else if cyrillic > 0 {
            ("rus", cyrillic)
        } else if arabic > 0 {
            ("ara", arabic)
        } else {
            return None;
        };

        if ratio(count) < 0.3 {
            return None;
        }

        Some(LanguagePrediction {
            lang: lang.to_string(),
            confidence: ratio(count).min(1.0),
        })
    }
}

impl LanguageDetector for StopwordLanguageDetector {
    fn predict(&self, text: &str) -> Option<LanguagePrediction> {
        if let Some(prediction) = Self::script_language(text) {
            return Some(prediction);
        }

        let words: Vec<String> = text
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .filter(|w| !w.is_empty())
            .map(|w| w.trim_matches('\'').to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return None;
        }

        let (lang, hits) = PROFILES
            .iter()
            .map(|(lang, stopwords)| {
                let hits = words.iter().filter(|w| stopwords.contains(w.as_str())).count();
                (*lang, hits)
            })
            .max_by_key(|(_, hits)| *hits)?;

        if hits == 0 {
            return None;
        }

        Some(LanguagePrediction {
            lang: lang.to_string(),
            confidence: hits as f64 / words.len() as f64,
        })
    }
}

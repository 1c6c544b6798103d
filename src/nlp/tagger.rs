/*!
 * Lexicon and suffix based Penn Treebank tagger.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::PosTagger;

/// Closed-class words and a handful of very common open-class ones
static LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        ("DT", &["the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no", "another", "either", "neither", "all", "both"]),
        ("PRP", &["i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "myself", "yourself", "himself", "herself", "itself", "ourselves", "themselves"]),
        ("PRP$", &["my", "your", "his", "its", "our", "their"]),
        ("IN", &["of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through", "during", "before", "after", "above", "below", "from", "up", "down", "over", "under", "since", "until", "while", "because", "although", "if", "than", "as", "like", "without", "within", "across", "behind", "beyond", "near", "upon", "toward", "towards", "onto", "off", "out", "around", "among", "via", "whether", "though"]),
        ("CC", &["and", "or", "but", "nor", "yet", "so", "plus"]),
        ("TO", &["to"]),
        ("MD", &["can", "could", "may", "might", "must", "shall", "should", "will", "would", "ca", "wo", "'ll", "'d"]),
        ("VB", &["be", "have", "do", "go", "get", "make", "see", "know", "take", "come", "think", "look", "want", "give", "use", "find", "tell", "ask", "work", "seem", "feel", "try", "leave", "call"]),
        ("VBZ", &["is", "has", "does", "'s", "goes", "says"]),
        ("VBP", &["am", "are", "'re", "'m", "'ve"]),
        ("VBD", &["was", "were", "had", "did", "said", "went", "got", "made", "came", "took", "saw", "knew", "thought", "told", "gave", "found", "left", "felt", "ran"]),
        ("VBN", &["been", "done", "gone", "seen", "known", "taken", "given", "made", "written", "spoken"]),
        ("VBG", &["being", "having", "doing", "going"]),
        ("WDT", &["which", "whatever"]),
        ("WP", &["who", "whom", "what", "whoever"]),
        ("WP$", &["whose"]),
        ("WRB", &["when", "where", "why", "how"]),
        ("EX", &["there"]),
        ("RB", &["not", "n't", "very", "too", "also", "just", "only", "never", "always", "often", "sometimes", "already", "still", "even", "again", "now", "then", "here", "soon", "away", "back", "ever", "quite", "rather", "almost", "perhaps", "maybe", "yesterday", "today", "tomorrow", "together", "really"]),
        ("RBR", &["more", "less", "better", "worse"]),
        ("RBS", &["most", "least", "best", "worst"]),
        ("JJ", &["good", "bad", "new", "old", "big", "small", "great", "little", "long", "short", "high", "low", "young", "large", "right", "wrong", "same", "different", "other", "own", "few", "many", "much", "several", "last", "next", "first", "able", "sure", "quick", "brown", "lazy", "deep", "dark", "happy", "sad", "real", "true", "free", "full", "whole", "early", "late"]),
        ("UH", &["oh", "yes", "yeah", "hey", "hello", "hi", "okay", "ok", "wow", "uh", "um", "please", "well"]),
        ("CD", &["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "hundred", "thousand", "million"]),
        ("POS", &["'"]),
        ("NN", &["gon", "na", "time", "way", "thing", "man", "woman", "day", "world", "life", "hand", "part", "place", "fox", "dog", "forest", "hill", "home", "house"]),
    ];

    let mut map = HashMap::new();
    for (tag, words) in groups {
        for word in *words {
            map.entry(*word).or_insert(*tag);
        }
    }
    map
});

/// Suffix rules, first match wins
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ness", "NN"),
    ("ment", "NN"),
    ("tion", "NN"),
    ("sion", "NN"),
    ("ship", "NN"),
    ("ity", "NN"),
    ("ism", "NN"),
    ("ist", "NN"),
    ("ous", "JJ"),
    ("ful", "JJ"),
    ("less", "JJ"),
    ("able", "JJ"),
    ("ible", "JJ"),
    ("ive", "JJ"),
    ("ical", "JJ"),
    ("ish", "JJ"),
    ("est", "JJS"),
    ("ly", "RB"),
    ("ing", "VBG"),
    ("ed", "VBD"),
    ("ize", "VB"),
    ("ise", "VB"),
    ("ify", "VB"),
];

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "!" | "?" | "..." | "…" | "。" | "！" | "？" => ".",
        "," | "，" | "、" => ",",
        ":" | ";" | "--" | "—" | "–" | "：" | "；" => ":",
        "(" | "[" | "{" | "（" | "「" | "『" => "-LRB-",
        ")" | "]" | "}" | "）" | "」" | "』" => "-RRB-",
        "\"" | "“" | "”" | "‘" | "’" | "«" | "»" => "''",
        "$" | "€" | "£" => "$",
        "#" => "#",
        _ => return None,
    };
    Some(tag)
}

/// Rule-based part-of-speech tagger
#[derive(Debug, Default, Clone)]
pub struct RuleBasedTagger;

impl RuleBasedTagger {
    pub fn new() -> Self {
        Self
    }

    fn lexical_tag(token: &str, position: usize) -> &'static str {
        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }

        let lower = token.to_lowercase();
        if let Some(tag) = LEXICON.get(lower.as_str()) {
            return tag;
        }

        if lower.chars().any(|c| c.is_ascii_digit())
            && lower.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '%'))
        {
            return "CD";
        }

        if position > 0 && token.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }

        if lower.chars().count() > 4 {
            if let Some((_, tag)) = SUFFIX_RULES.iter().find(|(suffix, _)| lower.ends_with(suffix)) {
                return tag;
            }
        }

        if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && lower.len() > 3 {
            return "NNS";
        }

        "NN"
    }
}

impl PosTagger for RuleBasedTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        let mut tags: Vec<&'static str> = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| Self::lexical_tag(token, i))
            .collect();

        // Contextual fixes
        for i in 1..tags.len() {
            let prev = tags[i - 1];
            let current = tags[i];
            tags[i] = match (prev, current) {
                ("MD", "NN") | ("MD", "VBP") | ("TO", "NN") | ("TO", "VBP") => "VB",
                ("DT", "VB") | ("DT", "VBP") | ("PRP$", "VB") | ("JJ", "VB") => "NN",
                ("PRP", "NNS") | ("NNP", "NNS") | ("NN", "NNS") if ends_with_s(&tokens[i]) && i + 1 < tags.len() && is_object_start(tags[i + 1]) => "VBZ",
                ("PRP", "NN") | ("PRP", "VB") => "VBP",
                ("VBZ", "VBD") | ("VBD", "VBD") | ("VBP", "VBD") => "VBN",
                _ => current,
            };
        }

        tags.into_iter().map(str::to_string).collect()
    }
}

fn ends_with_s(token: &str) -> bool {
    token.ends_with('s') || token.ends_with('S')
}

fn is_object_start(tag: &str) -> bool {
    matches!(tag, "DT" | "PRP$" | "PRP" | "IN" | "TO" | "RB" | "JJ" | "NN" | "NNS" | "NNP" | "CD")
}

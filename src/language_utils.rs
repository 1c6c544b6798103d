use anyhow::{Result, anyhow};
use isolang::Language;

/// Language tag helpers for subtitle track metadata.
///
/// Containers label tracks with ISO 639-1 (`en`), ISO 639-2/B (`ger`),
/// ISO 639-2/T (`deu`) or IETF tags (`en-US`); these helpers reduce all of
/// them to ISO 639-3 for comparison.

/// English tags accepted without consulting the code tables
pub const ENGLISH_TAGS: &[&str] = &["en", "en-us", "en-gb", "eng"];

// ISO 639-2/B codes that differ from their 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Language part of an IETF tag: `en-US` -> `en`, `pt_BR` -> `pt`
pub fn primary_subtag(tag: &str) -> &str {
    tag.trim().split(['-', '_']).next().unwrap_or_default()
}

/// Normalize a language code or IETF tag to ISO 639-3
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let primary = primary_subtag(code).to_lowercase();

    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(b, _)| *b == primary)
                .map_or(primary.as_str(), |(_, t)| *t);
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    language
        .map(|lang| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether a track language tag names English
pub fn is_english_tag(tag: &str) -> bool {
    let lowered = tag.trim().to_lowercase();
    ENGLISH_TAGS.contains(&lowered.as_str()) || language_codes_match(&lowered, "eng")
}

/// English name of the language behind a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/*!
 * Tag-pattern phrase chunker producing BIO chunk tags.
 */

use super::PhraseChunker;

fn is_noun(tag: &str) -> bool {
    matches!(tag, "NN" | "NNS" | "NNP" | "NNPS" | "CD")
}

fn is_adjective(tag: &str) -> bool {
    matches!(tag, "JJ" | "JJR" | "JJS")
}

fn is_determiner(tag: &str) -> bool {
    matches!(tag, "DT" | "PDT" | "PRP$" | "WP$")
}

fn is_np_part(tag: &str) -> bool {
    is_noun(tag) || is_adjective(tag) || is_determiner(tag) || tag == "POS"
}

fn is_pronoun(tag: &str) -> bool {
    matches!(tag, "PRP" | "EX" | "WP")
}

fn is_verb(tag: &str) -> bool {
    matches!(tag, "MD" | "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ")
}

fn is_adverb(tag: &str) -> bool {
    matches!(tag, "RB" | "RBR" | "RBS" | "WRB")
}

/// Rule chunker for NP, VP, PP, ADVP and ADJP
#[derive(Debug, Default, Clone)]
pub struct RuleChunker;

impl RuleChunker {
    pub fn new() -> Self {
        Self
    }

    fn label(out: &mut [String], start: usize, end: usize, kind: &str) {
        for (offset, slot) in out[start..end].iter_mut().enumerate() {
            let prefix = if offset == 0 { "B" } else { "I" };
            *slot = format!("{}-{}", prefix, kind);
        }
    }
}

impl PhraseChunker for RuleChunker {
    fn chunk(&self, tokens: &[String], tags: &[String]) -> Vec<String> {
        let n = tokens.len().min(tags.len());
        let tag = |k: usize| tags[k].as_str();
        let mut out = vec!["O".to_string(); n];
        let mut i = 0;

        while i < n {
            let t = tag(i);

            if is_pronoun(t) {
                Self::label(&mut out, i, i + 1, "NP");
                i += 1;
                continue;
            }

            if is_np_part(t) {
                let mut j = i + 1;
                // A determiner right after a noun opens a new noun phrase
                while j < n && is_np_part(tag(j)) && !(is_determiner(tag(j)) && is_noun(tag(j - 1))) {
                    j += 1;
                }
                let kind = if tags[i..j].iter().all(|t| is_adjective(t)) { "ADJP" } else { "NP" };
                Self::label(&mut out, i, j, kind);
                i = j;
                continue;
            }

            let starts_verb_group = is_verb(t) || (t == "TO" && i + 1 < n && tag(i + 1) == "VB");
            if starts_verb_group {
                let mut j = i + 1;
                while j < n {
                    let next_is_verb = j + 1 < n && is_verb(tag(j + 1));
                    if is_verb(tag(j)) || ((is_adverb(tag(j)) || tag(j) == "TO") && next_is_verb) {
                        j += 1;
                    } else {
                        break;
                    }
                }
                Self::label(&mut out, i, j, "VP");
                i = j;
                continue;
            }

            if t == "IN" || t == "TO" {
                Self::label(&mut out, i, i + 1, "PP");
                i += 1;
                continue;
            }

            if is_adverb(t) {
                let mut j = i + 1;
                while j < n && is_adverb(tag(j)) {
                    j += 1;
                }
                Self::label(&mut out, i, j, "ADVP");
                i = j;
                continue;
            }

            i += 1;
        }

        out
    }
}

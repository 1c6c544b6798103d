/*!
 * Vocabulary data model.
 *
 * Word identity is an explicit canonical key (`WordKey`, the lowercased
 * value). `Word` has no `PartialEq`/`Hash`; collections that need identity
 * key on `WordKey`.
 */

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of citations kept per word and per citation list
pub const MAX_CITATIONS: usize = 3;

/// Canonical identity of a word: its lowercased value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey(String);

impl WordKey {
    /// Build the key for a raw word or phrase
    pub fn new(value: &str) -> Self {
        Self(value.to_lowercase())
    }

    /// The lowercased form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A citation with its own timing; document citations carry empty timing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caption {
    pub start: String,
    pub end: String,
    pub content: String,
}

impl Caption {
    /// Create a timed caption
    pub fn new(start: impl Into<String>, end: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            content: content.into(),
        }
    }

    /// Create an untimed citation (a clipped document sentence)
    pub fn untimed(content: impl Into<String>) -> Self {
        Self::new("", "", content)
    }

    /// Whether this citation has timing information
    pub fn is_timed(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// A caption whose timing belongs to a separately linked media file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCaption {
    pub relate_video_path: String,
    pub subtitles_track_id: usize,
    pub subtitles_name: String,
    pub start: String,
    pub end: String,
    pub content: String,
}

impl fmt::Display for ExternalCaption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// A vocabulary entry with dictionary metadata and usage citations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub value: String,
    #[serde(default)]
    pub usphone: String,
    #[serde(default)]
    pub ukphone: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub collins: i32,
    #[serde(default)]
    pub oxford: bool,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub bnc: Option<i32>,
    #[serde(default)]
    pub frq: Option<i32>,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub external_captions: Vec<ExternalCaption>,
    #[serde(default)]
    pub captions: Vec<Caption>,
}

impl Word {
    /// Create a bare word with no metadata
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Canonical identity
    pub fn key(&self) -> WordKey {
        WordKey::new(&self.value)
    }

    /// Whether two words are the same entity
    pub fn same_as(&self, other: &Word) -> bool {
        self.key() == other.key()
    }

    /// Add a citation unless the cap is reached or it is already present
    pub fn push_caption(&mut self, caption: Caption) -> bool {
        push_capped(&mut self.captions, caption)
    }

    /// Add an external citation unless the cap is reached or it is already present
    pub fn push_external_caption(&mut self, caption: ExternalCaption) -> bool {
        push_capped(&mut self.external_captions, caption)
    }

    /// Number of citations of either kind
    pub fn citation_count(&self) -> usize {
        self.captions.len() + self.external_captions.len()
    }

    /// BNC rank, treating a missing value as 0
    pub fn bnc_rank(&self) -> i32 {
        self.bnc.unwrap_or(0)
    }

    /// FRQ (COCA) rank, treating a missing value as 0
    pub fn frq_rank(&self) -> i32 {
        self.frq.unwrap_or(0)
    }

    /// Move native captions into the external list, tagging them with the
    /// media file they came from
    pub fn externalize_captions(&mut self, video_path: &str, track_id: usize, subtitles_name: &str) {
        for caption in std::mem::take(&mut self.captions) {
            self.push_external_caption(ExternalCaption {
                relate_video_path: video_path.to_string(),
                subtitles_track_id: track_id,
                subtitles_name: subtitles_name.to_string(),
                start: caption.start,
                end: caption.end,
                content: caption.content,
            });
        }
    }

    /// Merge the citations of another form of the same entry, up to the cap
    pub fn merge_citations_from(&mut self, other: &Word) {
        for caption in &other.captions {
            self.push_caption(caption.clone());
        }
        for caption in &other.external_captions {
            self.push_external_caption(caption.clone());
        }
    }
}

fn push_capped<T: PartialEq>(list: &mut Vec<T>, item: T) -> bool {
    if list.len() >= MAX_CITATIONS || list.contains(&item) {
        return false;
    }
    list.push(item);
    true
}

/// Where a vocabulary's words came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VocabularyType {
    #[default]
    Document,
    Subtitles,
    Mkv,
}

impl fmt::Display for VocabularyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "DOCUMENT",
            Self::Subtitles => "SUBTITLES",
            Self::Mkv => "MKV",
        };
        f.write_str(name)
    }
}

/// A deduplicated list of words plus provenance.
///
/// `size` always equals the number of words; the word list is only reachable
/// through methods that keep both in step and reject duplicate keys. `index`
/// maps every key to its position in `word_list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawVocabulary")]
pub struct Vocabulary {
    pub name: String,
    #[serde(rename = "type")]
    pub vocabulary_type: VocabularyType,
    pub language: String,
    size: usize,
    pub relate_video_path: String,
    pub subtitles_track_id: usize,
    word_list: Vec<Word>,
    #[serde(skip)]
    index: HashMap<WordKey, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new(name: impl Into<String>, vocabulary_type: VocabularyType, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vocabulary_type,
            language: language.into(),
            size: 0,
            relate_video_path: String::new(),
            subtitles_track_id: 0,
            word_list: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Attach the media file and track the citations were timed against
    pub fn with_video(mut self, relate_video_path: impl Into<String>, subtitles_track_id: usize) -> Self {
        self.relate_video_path = relate_video_path.into();
        self.subtitles_track_id = subtitles_track_id;
        self
    }

    /// Number of words
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the vocabulary has no words
    pub fn is_empty(&self) -> bool {
        self.word_list.is_empty()
    }

    /// Words in first-discovery order
    pub fn words(&self) -> &[Word] {
        &self.word_list
    }

    /// Take the word list out of the vocabulary
    pub fn into_words(self) -> Vec<Word> {
        self.word_list
    }

    /// Whether a word with this key is present
    pub fn contains_key(&self, key: &WordKey) -> bool {
        self.index.contains_key(key)
    }

    /// The entry stored under `key`
    pub fn get(&self, key: &WordKey) -> Option<&Word> {
        self.index.get(key).map(|&position| &self.word_list[position])
    }

    /// Append a word; a word whose key is already present is rejected
    pub fn push_word(&mut self, word: Word) -> bool {
        let key = word.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.append(key, word);
        true
    }

    /// Append a word; when the key is already present its citations are
    /// merged into the existing entry instead
    pub fn merge_word(&mut self, word: Word) {
        let key = word.key();
        match self.index.get(&key) {
            Some(&position) => self.word_list[position].merge_citations_from(&word),
            None => self.append(key, word),
        }
    }

    /// Replace the word list, dropping later duplicates
    pub fn set_words(&mut self, words: Vec<Word>) {
        self.word_list.clear();
        self.index.clear();
        self.size = 0;
        for word in words {
            self.push_word(word);
        }
    }

    fn append(&mut self, key: WordKey, word: Word) {
        self.index.insert(key, self.word_list.len());
        self.word_list.push(word);
        self.size = self.word_list.len();
    }
}

/// On-disk shape of a vocabulary; `size` is recomputed on load
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVocabulary {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    vocabulary_type: VocabularyType,
    #[serde(default)]
    language: String,
    #[serde(default)]
    #[allow(dead_code)]
    size: usize,
    #[serde(default)]
    relate_video_path: String,
    #[serde(default)]
    subtitles_track_id: usize,
    #[serde(default)]
    word_list: Vec<Word>,
}

impl From<RawVocabulary> for Vocabulary {
    fn from(raw: RawVocabulary) -> Self {
        let mut vocabulary = Vocabulary::new(raw.name, raw.vocabulary_type, raw.language)
            .with_video(raw.relate_video_path, raw.subtitles_track_id);
        vocabulary.set_words(raw.word_list.into_iter().map(cap_citations).collect());
        vocabulary
    }
}

/// Loaded words keep at most `MAX_CITATIONS` of each citation kind
fn cap_citations(mut word: Word) -> Word {
    word.captions.truncate(MAX_CITATIONS);
    word.external_captions.truncate(MAX_CITATIONS);
    word
}

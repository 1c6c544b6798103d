/*!
 * Tests for the vocabulary model, matching and filtering
 */

use std::sync::Arc;

use anyhow::Result;

use wordharvest::app_config::FilterConfig;
use wordharvest::nlp::ExchangeLemmatizer;
use wordharvest::vocabulary::{
    exclude_known, Caption, MatchMode, Vocabulary, VocabularyFilter, VocabularyMatcher, VocabularyType, Word, WordKey,
};
use crate::common;

fn dictionary_word(value: &str) -> Word {
    common::dictionary_entries()
        .into_iter()
        .find(|w| w.value == value)
        .unwrap_or_else(|| Word::new(value))
}

fn cited(value: &str, citation: &str) -> Word {
    let mut word = dictionary_word(value);
    word.push_caption(Caption::untimed(citation));
    word
}

fn vocabulary(name: &str, values: &[&str]) -> Vocabulary {
    let mut vocabulary = Vocabulary::new(name, VocabularyType::Subtitles, "english");
    vocabulary.set_words(values.iter().map(|v| cited(v, &format!("{} in {}", v, name))).collect());
    vocabulary
}

fn matcher() -> VocabularyMatcher {
    VocabularyMatcher::new(Arc::new(ExchangeLemmatizer))
}

#[test]
fn test_vocabulary_size_shouldTrackWordCount() {
    let mut vocabulary = Vocabulary::new("v", VocabularyType::Document, "english");
    assert!(vocabulary.is_empty());

    assert!(vocabulary.push_word(Word::new("Dog")));
    assert!(!vocabulary.push_word(Word::new("dog")));
    vocabulary.merge_word(cited("DOG", "a dog barks"));
    vocabulary.merge_word(Word::new("cat"));

    assert_eq!(vocabulary.size(), 2);
    assert_eq!(vocabulary.size(), vocabulary.words().len());
    assert_eq!(vocabulary.words()[0].value, "Dog");
    assert_eq!(vocabulary.words()[0].captions.len(), 1);
    assert!(vocabulary.contains_key(&WordKey::new("CAT")));
}

#[test]
fn test_vocabulary_setWords_shouldDropLaterDuplicates() {
    let mut vocabulary = Vocabulary::new("v", VocabularyType::Document, "english");
    vocabulary.set_words(vec![cited("fox", "first"), cited("Fox", "second"), Word::new("dog")]);
    assert_eq!(vocabulary.size(), 2);
    assert_eq!(vocabulary.words()[0].captions[0].content, "first");
}

#[test]
fn test_vocabulary_deserialize_shouldRecomputeSize() -> Result<()> {
    let json = r#"{
        "name": "episode",
        "type": "MKV",
        "language": "english",
        "size": 99,
        "relateVideoPath": "/media/episode.mkv",
        "subtitlesTrackId": 2,
        "wordList": [
            { "value": "fox", "bnc": 5000, "captions": [ { "start": "00:00:01,000", "end": "00:00:02,000", "content": "a fox" } ] },
            { "value": "dog" },
            { "value": "Fox" }
        ]
    }"#;

    let vocabulary: Vocabulary = serde_json::from_str(json)?;
    assert_eq!(vocabulary.vocabulary_type, VocabularyType::Mkv);
    assert_eq!(vocabulary.subtitles_track_id, 2);
    assert_eq!(vocabulary.size(), 2);

    let written = serde_json::to_value(&vocabulary)?;
    assert_eq!(written["size"], 2);
    assert_eq!(written["type"], "MKV");
    assert_eq!(written["wordList"][0]["captions"][0]["content"], "a fox");
    assert!(written["wordList"][0].get("externalCaptions").is_some());
    Ok(())
}

#[test]
fn test_vocabulary_deserialize_withTooManyCitations_shouldCapThem() -> Result<()> {
    let captions: Vec<serde_json::Value> = (0..5)
        .map(|i| serde_json::json!({ "start": "", "end": "", "content": format!("apple {}", i) }))
        .collect();
    let json = serde_json::json!({
        "name": "fruit",
        "wordList": [
            { "value": "apple", "captions": captions, "externalCaptions": [] },
            { "value": "pear", "externalCaptions": (0..4).map(|i| serde_json::json!({
                "relateVideoPath": "/media/a.mkv",
                "subtitlesTrackId": 0,
                "subtitlesName": "a",
                "start": "00:00:01,000",
                "end": "00:00:02,000",
                "content": format!("pear {}", i)
            })).collect::<Vec<_>>() }
        ]
    });

    let vocabulary: Vocabulary = serde_json::from_value(json)?;
    let apple = &vocabulary.words()[0];
    assert_eq!(apple.captions.len(), 3);
    assert_eq!(apple.captions[2].content, "apple 2");
    assert_eq!(vocabulary.words()[1].external_captions.len(), 3);

    let written = serde_json::to_value(&vocabulary)?;
    assert_eq!(written["wordList"][0]["captions"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn test_vocabulary_mergeWord_withManyDuplicates_shouldIndexByKey() {
    let mut vocabulary = Vocabulary::new("batch", VocabularyType::Document, "english");
    for round in 0..3 {
        for i in 0..1000 {
            let value = if round == 1 { format!("WORD{}", i) } else { format!("word{}", i) };
            vocabulary.merge_word(cited(&value, &format!("round {}", round)));
        }
    }

    assert_eq!(vocabulary.size(), 1000);
    assert_eq!(vocabulary.words()[999].value, "word999");

    let entry = vocabulary.get(&WordKey::new("Word500")).unwrap();
    assert_eq!(entry.value, "word500");
    let citations: Vec<&str> = entry.captions.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(citations, vec!["round 0", "round 1", "round 2"]);
    assert!(vocabulary.get(&WordKey::new("word1000")).is_none());

    vocabulary.set_words(Vec::new());
    assert_eq!(vocabulary.size(), 0);
    assert!(!vocabulary.contains_key(&WordKey::new("word1")));
}

#[test]
fn test_word_externalizeCaptions_shouldMoveAndTag() {
    let mut word = cited("fox", "a fox");
    word.externalize_captions("/media/a.mkv", 3, "a");

    assert!(word.captions.is_empty());
    assert_eq!(word.external_captions.len(), 1);
    let external = &word.external_captions[0];
    assert_eq!(external.relate_video_path, "/media/a.mkv");
    assert_eq!(external.subtitles_track_id, 3);
    assert_eq!(external.subtitles_name, "a");
    assert_eq!(external.content, "a fox");
}

#[test]
fn test_matchLiteral_shouldKeepBaselineOrderAndProvenance() {
    let baseline = vocabulary("baseline", &["fox", "dog", "door", "hello"])
        .with_video("/media/base.mkv", 1);
    let comparison = vocabulary("comparison", &["Hello", "fox", "world"]);

    let matched = matcher().match_vocabularies(&baseline, &comparison, MatchMode::Literal);

    assert_eq!(common::values(matched.words()), vec!["fox", "hello"]);
    assert_eq!(matched.name, "baseline");
    assert_eq!(matched.relate_video_path, "/media/base.mkv");
    assert_eq!(matched.subtitles_track_id, 1);
    assert_eq!(matched.words()[0].captions[0].content, "fox in baseline");
    assert_eq!(matched.size(), 2);
}

#[test]
fn test_matchLiteral_shouldNotMutateInputs() {
    let baseline = vocabulary("baseline", &["fox", "dog"]);
    let comparison = vocabulary("comparison", &["dog"]);

    let _ = matcher().match_vocabularies(&baseline, &comparison, MatchMode::Literal);
    let _ = matcher().match_vocabularies(&baseline, &comparison, MatchMode::Lemma);

    assert_eq!(common::values(baseline.words()), vec!["fox", "dog"]);
    assert_eq!(common::values(comparison.words()), vec!["dog"]);
    assert_eq!(baseline.words()[0].captions.len(), 1);
}

#[test]
fn test_matchLemma_shouldMatchInflectedForms() {
    let baseline = vocabulary("baseline", &["go", "dog", "run"]);
    let comparison = vocabulary("comparison", &["went", "running", "cat"]);

    let literal = matcher().match_vocabularies(&baseline, &comparison, MatchMode::Literal);
    assert!(literal.is_empty());

    let lemma = matcher().match_vocabularies(&baseline, &comparison, MatchMode::Lemma);
    assert_eq!(common::values(lemma.words()), vec!["go", "run"]);
}

#[test]
fn test_matchLemma_withSharedLemma_shouldResolveToLastBaselineWord() {
    let comparison = vocabulary("comparison", &["run"]);

    let forward = vocabulary("baseline", &["run", "running"]);
    let matched = matcher().match_vocabularies(&forward, &comparison, MatchMode::Lemma);
    assert_eq!(common::values(matched.words()), vec!["running"]);

    let reversed = vocabulary("baseline", &["running", "run"]);
    let matched = matcher().match_vocabularies(&reversed, &comparison, MatchMode::Lemma);
    assert_eq!(common::values(matched.words()), vec!["run"]);
}

#[test]
fn test_matchMode_fromUseLemma() {
    assert_eq!(MatchMode::from_use_lemma(true), MatchMode::Lemma);
    assert_eq!(MatchMode::from_use_lemma(false), MatchMode::Literal);
}

#[test]
fn test_filter_withThresholds_shouldDropFrequentAndNumbers() -> Result<()> {
    let options = FilterConfig {
        bnc_threshold: Some(1000),
        ..FilterConfig::default()
    };
    let filter = VocabularyFilter::new(common::seeded_dictionary(), Arc::new(ExchangeLemmatizer), options);

    let source = vocabulary("episode", &["the", "fox", "world", "alice", "1984", "3.5"]);
    let filtered = filter.filter_vocabulary(&source)?;

    assert_eq!(common::values(filtered.words()), vec!["fox", "alice"]);
    assert_eq!(filtered.name, "episode");
    assert_eq!(source.size(), 6);
    Ok(())
}

#[test]
fn test_filter_withZeroRankRule_shouldDropUnranked() -> Result<()> {
    let options = FilterConfig {
        filter_bnc_zero: true,
        ..FilterConfig::default()
    };
    let filter = VocabularyFilter::new(common::seeded_dictionary(), Arc::new(ExchangeLemmatizer), options);

    let words = filter.filter_words(&[dictionary_word("alice"), dictionary_word("door")])?;
    assert_eq!(common::values(&words), vec!["door"]);
    Ok(())
}

#[test]
fn test_filter_withReplaceToLemma_shouldSubstituteLemmaInPlace() -> Result<()> {
    let options = FilterConfig {
        replace_to_lemma: true,
        ..FilterConfig::default()
    };
    let filter = VocabularyFilter::new(common::seeded_dictionary(), Arc::new(ExchangeLemmatizer), options);

    let words = filter.filter_words(&[
        cited("went", "she went home"),
        cited("running", "keep running"),
        cited("dog", "a dog"),
        cited("run", "run away"),
    ])?;

    assert_eq!(common::values(&words), vec!["go", "dog", "run"]);
    assert_eq!(words[0].captions, vec![Caption::untimed("she went home")]);
    assert_eq!(words[0].bnc, Some(50));

    let run_citations: Vec<&str> = words[2].captions.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(run_citations, vec!["run away", "keep running"]);
    Ok(())
}

#[test]
fn test_excludeKnown_shouldRemoveWordsOfOtherVocabularies() {
    let words = vocabulary("new", &["fox", "dog", "door", "hello"]).into_words();
    let known = [vocabulary("a", &["DOG"]), vocabulary("b", &["hello", "world"])];

    let remaining = exclude_known(words, &known);
    assert_eq!(common::values(&remaining), vec!["fox", "door"]);
}

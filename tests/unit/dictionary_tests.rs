/*!
 * Tests for dictionary storage and candidate validation
 */

use std::sync::Arc;

use anyhow::Result;

use wordharvest::dictionary::{Dictionary, DictionaryConnection, SqliteDictionary};
use wordharvest::errors::DictionaryError;
use wordharvest::extraction::CitationMap;
use wordharvest::pipeline::DictionaryValidator;
use wordharvest::vocabulary::{Caption, MAX_CITATIONS};
use crate::common;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_queryBatch_withUnknownWord_shouldReturnEmpty() -> Result<()> {
    let dictionary = common::seeded_dictionary();
    assert!(dictionary.query_batch(&strings(&["zzznotarealword"]))?.is_empty());
    assert!(dictionary.query_batch(&[])?.is_empty());
    Ok(())
}

#[test]
fn test_queryBatch_shouldReturnEveryHitOnce() -> Result<()> {
    let dictionary = common::seeded_dictionary();
    let mut found: Vec<String> = dictionary
        .query_batch(&strings(&["fox", "dog", "fox", "missing", "lazy dog"]))?
        .into_iter()
        .map(|w| w.value)
        .collect();
    found.sort();
    assert_eq!(found, vec!["dog", "fox", "lazy dog"]);
    Ok(())
}

#[test]
fn test_query_shouldMapDictionaryColumns() -> Result<()> {
    let dictionary = common::seeded_dictionary();
    let went = dictionary.query("went")?.expect("went is seeded");
    assert_eq!(went.bnc, Some(700));
    assert_eq!(went.frq, Some(650));
    assert_eq!(went.exchange, "0:go/1:p");
    assert_eq!(went.translation, "translation of went");
    assert!(went.captions.is_empty());
    Ok(())
}

#[test]
fn test_stats_shouldReflectSeededEntries() -> Result<()> {
    let dictionary = common::seeded_dictionary();
    let stats = dictionary.stats()?;
    assert_eq!(stats.word_count, common::dictionary_entries().len());
    assert_eq!(stats.max_bnc, 12000);
    assert_eq!(stats.max_frq, 12500);
    assert!(stats.to_string().starts_with("Words: "));
    Ok(())
}

#[test]
fn test_create_thenOpen_shouldPersistEntries() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("data").join("ecdict.db");

    let created = SqliteDictionary::new(DictionaryConnection::create(&path)?);
    created.insert_words(&common::dictionary_entries()[..3])?;
    drop(created);

    let reopened = SqliteDictionary::open(&path)?;
    assert_eq!(reopened.word_count()?, 3);
    assert!(reopened.query("quick")?.is_some());
    Ok(())
}

#[test]
fn test_open_withMissingFile_shouldBeNotFound() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let result = SqliteDictionary::open(dir.path().join("absent.db"));
    assert!(matches!(result, Err(DictionaryError::NotFound(_))));
    Ok(())
}

#[test]
fn test_validate_shouldDropMissesAndKeepDiscoveryOrder() -> Result<()> {
    let validator = DictionaryValidator::new(common::seeded_dictionary());
    let mut citations = CitationMap::new();
    citations.register("Hello", Caption::untimed("Hello world!"));
    citations.register("zzznotarealword", Caption::untimed("zzznotarealword here"));
    citations.register("world", Caption::untimed("Hello world!"));
    citations.register("fox", Caption::new("00:00:01,000", "00:00:02,000", "a fox"));

    let words = validator.validate(&citations)?;
    assert_eq!(common::values(&words), vec!["hello", "world", "fox"]);
    assert_eq!(words[0].captions, vec![Caption::untimed("Hello world!")]);
    assert_eq!(words[2].captions[0].start, "00:00:01,000");
    assert_eq!(words[0].definition, "definition of hello");
    Ok(())
}

#[test]
fn test_validate_shouldCapCitations() -> Result<()> {
    let validator = DictionaryValidator::new(common::seeded_dictionary());
    let mut citations = CitationMap::new();
    for i in 0..10 {
        citations.register("dog", Caption::untimed(format!("dog number {}", i)));
    }

    let words = validator.validate(&citations)?;
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].captions.len(), MAX_CITATIONS);
    Ok(())
}

#[test]
fn test_validate_withEmptyMap_shouldNotQuery() -> Result<()> {
    let dictionary: Arc<dyn Dictionary> = Arc::new(SqliteDictionary::new_in_memory()?);
    let words = DictionaryValidator::new(dictionary).validate(&CitationMap::new())?;
    assert!(words.is_empty());
    Ok(())
}

/*!
 * Controller round trips through vocabulary files
 */

use std::path::Path;

use anyhow::Result;

use wordharvest::app_config::Config;
use wordharvest::app_controller::Controller;
use wordharvest::vocabulary::{Caption, MatchMode, Vocabulary, VocabularyType, Word};
use crate::common;

fn controller() -> Controller {
    Controller::with_dictionary(Config::default(), common::seeded_dictionary())
}

fn write_vocabulary(dir: &Path, name: &str, words: &[&str]) -> Result<std::path::PathBuf> {
    let mut vocabulary = Vocabulary::new(name, VocabularyType::Subtitles, "english");
    vocabulary.set_words(
        words
            .iter()
            .map(|value| {
                let mut word = common::dictionary_entries()
                    .into_iter()
                    .find(|w| w.value == *value)
                    .unwrap_or_else(|| Word::new(*value));
                word.push_caption(Caption::untimed(format!("{} from {}", value, name)));
                word
            })
            .collect(),
    );
    let path = dir.join(format!("{}.json", name));
    Controller::write_vocabulary(&vocabulary, &path)?;
    Ok(path)
}

#[tokio::test]
async fn test_extract_withDocument_shouldWriteJsonNextToInput() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "chapter.txt", "Hello world! The dog went home.")?;

    let output = controller().extract(&input, None, None).await?;
    assert_eq!(output, dir.path().join("chapter.json"));

    let vocabulary = Controller::read_vocabulary(&output)?;
    assert_eq!(vocabulary.name, "chapter");
    assert_eq!(vocabulary.vocabulary_type, VocabularyType::Document);
    assert_eq!(common::values(vocabulary.words()), vec!["hello", "world", "the", "dog", "went"]);
    assert_eq!(vocabulary.size(), 5);
    Ok(())
}

#[tokio::test]
async fn test_extract_withMissingInput_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let result = controller().extract(&dir.path().join("nothing.txt"), None, None).await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_extract_withUnsupportedInput_shouldReportKind() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "slides.pptx", "binary")?;

    let error = controller().extract(&input, None, None).await.unwrap_err();
    assert!(error.to_string().contains("parse-error"));
    Ok(())
}

#[test]
fn test_matchFiles_shouldWriteIntersection() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let baseline = write_vocabulary(dir.path(), "baseline", &["go", "dog", "door", "run"])?;
    let comparison = write_vocabulary(dir.path(), "comparison", &["went", "door", "running"])?;
    let output = dir.path().join("out").join("matched.json");

    let literal = controller().match_files(&baseline, &comparison, MatchMode::Literal, &output)?;
    assert_eq!(common::values(literal.words()), vec!["door"]);

    let lemma = controller().match_files(&baseline, &comparison, MatchMode::Lemma, &output)?;
    assert_eq!(common::values(lemma.words()), vec!["go", "door", "run"]);

    let written = Controller::read_vocabulary(&output)?;
    assert_eq!(written.name, "baseline");
    assert_eq!(written.size(), 3);
    assert_eq!(written.words()[0].captions[0].content, "go from baseline");
    Ok(())
}

#[test]
fn test_filterFile_shouldApplyRulesAndExcludes() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = write_vocabulary(dir.path(), "episode", &["the", "fox", "42", "door", "hello"])?;
    let known = write_vocabulary(dir.path(), "known", &["door"])?;
    let output = dir.path().join("filtered.json");

    let mut config = Config::default();
    config.filter.bnc_threshold = Some(100);
    let controller = Controller::with_dictionary(config, common::seeded_dictionary());

    let filtered = controller.filter_file(&input, &[known], &output)?;
    assert_eq!(common::values(filtered.words()), vec!["fox", "hello"]);
    assert_eq!(Controller::read_vocabulary(&output)?.size(), 2);
    Ok(())
}

#[test]
fn test_lookupAndStats_shouldUseDictionary() -> Result<()> {
    let controller = controller();
    assert_eq!(controller.lookup("fox")?.map(|w| w.bnc), Some(Some(5000)));
    assert!(controller.lookup("zzznotarealword")?.is_none());
    assert_eq!(controller.dictionary_stats()?.word_count, common::dictionary_entries().len());
    Ok(())
}

#[test]
fn test_readVocabulary_withInvalidJson_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "broken.json", "{ not json")?;
    assert!(Controller::read_vocabulary(&path).is_err());
    Ok(())
}

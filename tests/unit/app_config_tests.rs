/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use wordharvest::app_config::{Config, LogLevel, TranscoderKind};
use crate::common;

#[test]
fn test_default_config_shouldUseDocumentedDefaults() {
    let config = Config::default();
    assert!(config.extraction.enable_phrases);
    assert_eq!(config.extraction.sentence_length, 25);
    assert_eq!(config.media.ffmpeg_path, "ffmpeg");
    assert_eq!(config.media.timeout_secs, 120);
    assert_eq!(config.media.language_sample_size, 10);
    assert_eq!(config.media.transcoder, TranscoderKind::Native);
    assert!(config.filter.filter_numbers);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "wordharvest.json",
        r#"{ "extraction": { "sentence_length": 12 }, "media": { "transcoder": "ffmpeg" }, "log_level": "debug" }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.extraction.sentence_length, 12);
    assert!(config.extraction.enable_phrases);
    assert_eq!(config.media.transcoder, TranscoderKind::Ffmpeg);
    assert_eq!(config.media.ffprobe_path, "ffprobe");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_save_thenLoad_shouldPreserveValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.dictionary_path = "/data/ecdict.db".to_string();
    config.filter.bnc_threshold = Some(3000);
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.dictionary_path, "/data/ecdict.db");
    assert_eq!(loaded.filter.bnc_threshold, Some(3000));
    assert_eq!(loaded.dictionary_location()?, std::path::PathBuf::from("/data/ecdict.db"));
    Ok(())
}

#[test]
fn test_validate_withTinySentenceLength_shouldFail() {
    let mut config = Config::default();
    config.extraction.sentence_length = 1;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withSampleSizeOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.media.language_sample_size = 0;
    assert!(config.validate().is_err());
    config.media.language_sample_size = 101;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNonPositiveThreshold_shouldFail() {
    let mut config = Config::default();
    config.filter.frq_threshold = Some(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

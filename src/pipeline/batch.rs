/*!
 * Sequential multi-file extraction with per-file failure isolation.
 */

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use log::{error, info};
use serde::Serialize;

use crate::errors::{ExtractionError, FailureKind};
use crate::file_utils::FileManager;
use crate::pipeline::builder::{ProgressSink, VocabularyBuilder};
use crate::vocabulary::Word;

/// Why one file of a batch produced no words
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl FileFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<&ExtractionError> for FileFailure {
    fn from(error: &ExtractionError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Words of every successful file, concatenated in file order
    pub words: Vec<Word>,
    /// Failed files and why
    pub errors: BTreeMap<PathBuf, FileFailure>,
    /// Number of files that succeeded
    pub succeeded: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

/// Runs the media build over many files, one after the other
pub struct BatchJobRunner<'a> {
    builder: &'a VocabularyBuilder,
}

impl<'a> BatchJobRunner<'a> {
    pub fn new(builder: &'a VocabularyBuilder) -> Self {
        Self { builder }
    }

    /// Process `files` in order. `on_file_done` fires exactly once per file
    /// with its success flag; a failing or panicking file never stops the
    /// batch.
    pub async fn run<F>(&self, files: &[PathBuf], mut on_file_done: F, progress: ProgressSink<'_>) -> BatchReport
    where
        F: FnMut(&Path, bool),
    {
        let mut report = BatchReport::default();

        for (i, path) in files.iter().enumerate() {
            progress(&format!("[{}/{}] {}", i + 1, files.len(), path.display()));

            let outcome = AssertUnwindSafe(self.process_file(path, progress)).catch_unwind().await;
            let result = match outcome {
                Ok(result) => result,
                Err(panic) => Err(ExtractionError::Unexpected(panic_message(panic.as_ref()))),
            };

            match result {
                Ok(words) => {
                    info!("Extracted {} words from {:?}", words.len(), path);
                    report.words.extend(words);
                    report.succeeded += 1;
                    on_file_done(path, true);
                }
                Err(e) => {
                    let failure = FileFailure::from(&e);
                    error!("Skipping {:?}: {}", path, failure);
                    report.errors.insert(path.clone(), failure);
                    on_file_done(path, false);
                }
            }
        }

        info!(
            "Batch finished: {} succeeded, {} failed, {} words",
            report.succeeded,
            report.failed(),
            report.words.len()
        );
        report
    }

    /// One file's words, with citations re-homed as external captions
    async fn process_file(&self, path: &Path, progress: ProgressSink<'_>) -> Result<Vec<Word>, ExtractionError> {
        let vocabulary = self.builder.build_from_media(path, None, progress).await?;

        let video_path = path.to_string_lossy().into_owned();
        let subtitles_name = FileManager::file_stem(path);
        let track_id = vocabulary.subtitles_track_id;

        Ok(vocabulary
            .into_words()
            .into_iter()
            .map(|mut word| {
                word.externalize_captions(&video_path, track_id, &subtitles_name);
                word
            })
            .collect())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic during file processing".to_string()
    }
}

/*!
 * The extraction pipeline: dictionary validation, single-input builds and
 * batch runs.
 */

pub mod batch;
pub mod builder;
pub mod validator;

pub use batch::{BatchJobRunner, BatchReport, FileFailure};
pub use builder::{no_progress, ProgressSink, VocabularyBuilder, VOCABULARY_LANGUAGE};
pub use validator::DictionaryValidator;

/*!
 * # wordharvest
 *
 * Builds vocabulary lists from documents, subtitle files and the subtitle
 * tracks of media containers, and compares vocabularies with each other.
 *
 * ## Features
 *
 * - Sentence segmentation, tokenization and phrase chunking with built-in
 *   rule models
 * - Clipped usage citations for every word, at most three per word
 * - SRT, ASS/SSA and container-embedded subtitle tracks (via ffprobe/ffmpeg)
 * - English track selection with SDH preference and language detection
 * - Closed-vocabulary validation against an ECDICT-style SQLite dictionary
 * - Batch runs with classified per-file failures
 * - Literal and lemma-based vocabulary matching, frequency filtering
 *
 * ## Architecture
 *
 * - `nlp`: collaborator traits and the built-in models
 * - `extraction`: candidates, citation windows and the citation map
 * - `subtitle`: caption normalization, SRT/ASS parsing, container access,
 *   track selection
 * - `dictionary`: the `Dictionary` trait and its SQLite implementation
 * - `pipeline`: dictionary validation, `VocabularyBuilder`, `BatchJobRunner`
 * - `vocabulary`: the data model, matching and filtering
 * - `app_config`, `app_controller`, `file_utils`, `language_utils`, `errors`
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod dictionary;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod nlp;
pub mod pipeline;
pub mod subtitle;
pub mod vocabulary;

pub use app_config::Config;
pub use errors::{ExtractionError, FailureKind};
pub use pipeline::{BatchJobRunner, VocabularyBuilder};
pub use vocabulary::{Vocabulary, Word};

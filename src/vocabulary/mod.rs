/*!
 * Vocabulary aggregate, matching and filtering.
 */

pub mod filter;
pub mod matcher;
pub mod model;

pub use filter::{exclude_known, VocabularyFilter};
pub use matcher::{MatchMode, VocabularyMatcher};
pub use model::{Caption, ExternalCaption, Vocabulary, VocabularyType, Word, WordKey, MAX_CITATIONS};

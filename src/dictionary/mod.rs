/*!
 * Dictionary access.
 *
 * The pipeline only sees the `Dictionary` trait. `SqliteDictionary` is the
 * ECDICT-backed implementation; a miss is an absent result, never an error.
 */

pub mod connection;
pub mod repository;
pub mod schema;

pub use connection::DictionaryConnection;
pub use repository::{DictionaryStats, SqliteDictionary, QUERY_CHUNK_SIZE};

use crate::errors::DictionaryError;
use crate::vocabulary::Word;

/// Read-only word lookup service
pub trait Dictionary: Send + Sync {
    /// Look up one word
    fn query(&self, word: &str) -> Result<Option<Word>, DictionaryError>;

    /// Look up many words; misses are simply absent and order is unspecified
    fn query_batch(&self, words: &[String]) -> Result<Vec<Word>, DictionaryError>;
}

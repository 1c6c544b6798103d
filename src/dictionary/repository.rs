/*!
 * SQLite-backed dictionary queries.
 */

use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;

use super::connection::DictionaryConnection;
use super::schema::WORD_COLUMNS;
use super::Dictionary;
use crate::errors::DictionaryError;
use crate::vocabulary::Word;

/// Keys per `IN (...)` query, below SQLite's bound-parameter limit
pub const QUERY_CHUNK_SIZE: usize = 900;

/// Dictionary backed by an ECDICT SQLite database
#[derive(Clone)]
pub struct SqliteDictionary {
    db: DictionaryConnection,
}

impl SqliteDictionary {
    /// Wrap an open connection
    pub fn new(db: DictionaryConnection) -> Self {
        Self { db }
    }

    /// Open an existing dictionary file
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DictionaryError> {
        Ok(Self::new(DictionaryConnection::open(path)?))
    }

    /// Create an empty in-memory dictionary (for testing)
    pub fn new_in_memory() -> Result<Self, DictionaryError> {
        Ok(Self::new(DictionaryConnection::new_in_memory()?))
    }

    /// The underlying connection
    pub fn connection(&self) -> &DictionaryConnection {
        &self.db
    }

    fn row_to_word(row: &Row) -> rusqlite::Result<Word> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };
        let number = |idx: usize| -> rusqlite::Result<i32> {
            Ok(row.get::<_, Option<i32>>(idx)?.unwrap_or(0))
        };

        Ok(Word {
            value: text(0)?,
            ukphone: text(1)?,
            usphone: text(2)?,
            definition: text(3)?.replace("\\n", "\n"),
            translation: text(4)?.replace("\\n", "\n"),
            pos: text(5)?,
            collins: number(6)?,
            oxford: number(7)? != 0,
            tag: text(8)?,
            bnc: Some(number(9)?),
            frq: Some(number(10)?),
            exchange: text(11)?,
            ..Default::default()
        })
    }

    fn query_sync(conn: &Connection, word: &str) -> Result<Option<Word>, DictionaryError> {
        let sql = format!("SELECT {} FROM ecdict WHERE word = ?1 LIMIT 1", WORD_COLUMNS);
        let found = conn
            .query_row(&sql, [word], Self::row_to_word)
            .optional()?;
        Ok(found)
    }

    fn query_where(&self, condition: &'static str, a: i32, b: i32) -> Result<Vec<Word>, DictionaryError> {
        self.db.execute(|conn| {
            let sql = format!("SELECT {} FROM ecdict WHERE {}", WORD_COLUMNS, condition);
            let mut stmt = conn.prepare(&sql)?;
            let words = stmt
                .query_map(params![a, b], Self::row_to_word)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(words)
        })
    }

    /// Words whose BNC rank lies in `start..=end`, ordered by rank
    pub fn query_by_bnc_range(&self, start: i32, end: i32) -> Result<Vec<Word>, DictionaryError> {
        self.query_where("bnc != 0 AND bnc >= ?1 AND bnc <= ?2 ORDER BY bnc", start, end)
    }

    /// Words whose FRQ rank lies in `start..=end`, ordered by rank
    pub fn query_by_frq_range(&self, start: i32, end: i32) -> Result<Vec<Word>, DictionaryError> {
        self.query_where("frq != 0 AND frq >= ?1 AND frq <= ?2 ORDER BY frq", start, end)
    }

    /// Highest BNC rank in the dictionary
    pub fn max_bnc(&self) -> Result<i32, DictionaryError> {
        self.db.execute(|conn| {
            let max: Option<i32> = conn.query_row("SELECT MAX(bnc) FROM ecdict", [], |row| row.get(0))?;
            Ok(max.unwrap_or(0))
        })
    }

    /// Highest FRQ rank in the dictionary
    pub fn max_frq(&self) -> Result<i32, DictionaryError> {
        self.db.execute(|conn| {
            let max: Option<i32> = conn.query_row("SELECT MAX(frq) FROM ecdict", [], |row| row.get(0))?;
            Ok(max.unwrap_or(0))
        })
    }

    /// Number of entries
    pub fn word_count(&self) -> Result<usize, DictionaryError> {
        self.db.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM ecdict", [], |row| row.get(0))?;
            Ok(count.max(0) as usize)
        })
    }

    /// Insert entries; newlines in definitions are stored as literal `\n`
    pub fn insert_words(&self, words: &[Word]) -> Result<usize, DictionaryError> {
        self.db.transaction(|tx| {
            let sql = format!(
                "INSERT INTO ecdict ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                WORD_COLUMNS
            );
            let mut stmt = tx.prepare(&sql)?;
            for word in words {
                stmt.execute(params![
                    word.value,
                    word.ukphone,
                    word.usphone,
                    word.definition.replace('\n', "\\n"),
                    word.translation.replace('\n', "\\n"),
                    word.pos,
                    word.collins,
                    word.oxford as i32,
                    word.tag,
                    word.bnc_rank(),
                    word.frq_rank(),
                    word.exchange,
                ])?;
            }
            debug!("Inserted {} dictionary entries", words.len());
            Ok(words.len())
        })
    }

    /// Remove every entry for a word; returns the number of rows deleted
    pub fn delete_word(&self, word: &str) -> Result<usize, DictionaryError> {
        self.db.execute(|conn| Ok(conn.execute("DELETE FROM ecdict WHERE word = ?1", [word])?))
    }

    /// Summary numbers for display
    pub fn stats(&self) -> Result<DictionaryStats, DictionaryError> {
        Ok(DictionaryStats {
            word_count: self.word_count()?,
            max_bnc: self.max_bnc()?,
            max_frq: self.max_frq()?,
        })
    }
}

impl Dictionary for SqliteDictionary {
    fn query(&self, word: &str) -> Result<Option<Word>, DictionaryError> {
        self.db.execute(|conn| Self::query_sync(conn, word))
    }

    fn query_batch(&self, words: &[String]) -> Result<Vec<Word>, DictionaryError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        self.db.execute(|conn| {
            let mut found: HashMap<String, Word> = HashMap::new();
            for chunk in words.chunks(QUERY_CHUNK_SIZE) {
                let placeholders = vec!["?"; chunk.len()].join(", ");
                let sql = format!(
                    "SELECT {} FROM ecdict WHERE word IN ({})",
                    WORD_COLUMNS, placeholders
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(chunk.iter()), Self::row_to_word)?;
                for word in rows {
                    let word = word?;
                    found.entry(word.value.clone()).or_insert(word);
                }
            }

            debug!("Dictionary batch: {} of {} candidates found", found.len(), words.len());
            Ok(found.into_values().collect())
        })
    }
}

/// Dictionary statistics
#[derive(Debug, Clone)]
pub struct DictionaryStats {
    /// Number of entries
    pub word_count: usize,
    /// Highest BNC rank
    pub max_bnc: i32,
    /// Highest FRQ rank
    pub max_frq: i32,
}

impl std::fmt::Display for DictionaryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Words: {}, Max BNC: {}, Max FRQ: {}",
            self.word_count, self.max_bnc, self.max_frq
        )
    }
}

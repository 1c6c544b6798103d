/*!
 * ECDICT table layout.
 */

use log::debug;
use rusqlite::Connection;

use crate::errors::DictionaryError;

/// Name of the dictionary table
pub const TABLE_NAME: &str = "ecdict";

/// Columns read for every word, in row order
pub const WORD_COLUMNS: &str = "word, british_phonetic, american_phonetic, definition, translation, \
                                pos, collins, oxford, tag, bnc, frq, exchange";

/// Create the dictionary table when it does not exist yet
pub fn initialize_schema(conn: &Connection) -> Result<(), DictionaryError> {
    debug!("Initializing dictionary schema");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS ecdict (
            word TEXT NOT NULL,
            british_phonetic TEXT,
            american_phonetic TEXT,
            definition TEXT,
            translation TEXT,
            pos TEXT,
            collins INTEGER DEFAULT 0,
            oxford INTEGER DEFAULT 0,
            tag TEXT,
            bnc INTEGER DEFAULT 0,
            frq INTEGER DEFAULT 0,
            exchange TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_ecdict_word ON ecdict(word);
        "#,
    )?;

    Ok(())
}

/// Whether the connection holds an `ecdict` table
pub fn has_dictionary_table(conn: &Connection) -> Result<bool, DictionaryError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [TABLE_NAME],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

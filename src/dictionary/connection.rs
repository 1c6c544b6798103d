/*!
 * Dictionary connection management.
 *
 * One long-lived SQLite connection is opened per dictionary and shared behind
 * `Arc<Mutex<_>>`; the pipeline receives it as an injected dependency instead
 * of opening a connection per query.
 */

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::schema;
use crate::errors::DictionaryError;

/// Default dictionary filename
const DEFAULT_DICTIONARY_FILENAME: &str = "ecdict.db";

/// Default directory name under the user's data directory
const DEFAULT_DICTIONARY_DIRNAME: &str = "wordharvest";

/// Dictionary connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DictionaryConnection {
    /// Path to the dictionary file
    path: PathBuf,
    /// Shared connection
    connection: Arc<Mutex<Connection>>,
}

impl DictionaryConnection {
    /// Open an existing dictionary at the default location
    pub fn open_default() -> Result<Self, DictionaryError> {
        let path = Self::default_dictionary_path()?;
        Self::open(&path)
    }

    /// Open an existing dictionary file; the `ecdict` table must be present
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(DictionaryError::NotFound(path));
        }

        info!("Opening dictionary at: {:?}", path);

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        if !schema::has_dictionary_table(&conn)? {
            return Err(DictionaryError::Invalid {
                path,
                message: format!("missing table '{}'", schema::TABLE_NAME),
            });
        }

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a dictionary file, creating it and its schema when missing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DictionaryError::Invalid {
                    path: path.clone(),
                    message: format!("cannot create directory {:?}: {}", parent, e),
                })?;
            }
        }

        info!("Creating dictionary at: {:?}", path);

        let conn = Connection::open(&path)?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an empty in-memory dictionary (for testing)
    pub fn new_in_memory() -> Result<Self, DictionaryError> {
        debug!("Creating in-memory dictionary");

        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default dictionary path
    pub fn default_dictionary_path() -> Result<PathBuf, DictionaryError> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| DictionaryError::NotFound(PathBuf::from(DEFAULT_DICTIONARY_FILENAME)))?;

        Ok(base_dir
            .join(DEFAULT_DICTIONARY_DIRNAME)
            .join(DEFAULT_DICTIONARY_FILENAME))
    }

    /// Get the dictionary file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is an in-memory dictionary
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Execute an operation with the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T, DictionaryError>
    where
        F: FnOnce(&Connection) -> Result<T, DictionaryError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|_| DictionaryError::LockPoisoned)?;

        f(&conn)
    }

    /// Run operations inside one transaction
    pub fn transaction<F, T>(&self, f: F) -> Result<T, DictionaryError>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T, DictionaryError>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|_| DictionaryError::LockPoisoned)?;

        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;

        Ok(result)
    }
}

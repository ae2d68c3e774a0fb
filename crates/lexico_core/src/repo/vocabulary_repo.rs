//! Vocabulary repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist words with their annotations.
//! - List words decorated with one caller-selected annotation type.
//!
//! # Invariants
//! - Write paths call `NewWord::validate()` before SQL mutations.
//! - `save_word` writes the word and all annotations in one transaction.
//! - Re-saving an existing word keeps its id and replaces annotations by type.
//! - Listing order is insertion order (ascending id).

use crate::db::DbError;
use crate::model::word::{
    normalize_word, Annotation, NewWord, Word, WordEntry, WordId, WordValidationError,
};
use log::{error, info};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const REQUIRED_TABLES: [&str; 2] = ["vocabulary", "vocabulary_info"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for vocabulary persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(WordValidationError),
    Db(DbError),
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Returns whether the failure means the database was never initialized.
    pub fn is_not_initialized(&self) -> bool {
        match self {
            Self::Db(err) => err.is_not_initialized(),
            Self::MissingRequiredTable(_) => true,
            Self::Validation(_) => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<WordValidationError> for RepoError {
    fn from(value: WordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the local vocabulary.
pub trait VocabularyRepository {
    /// Saves one word with all its annotations atomically.
    fn save_word(&mut self, word: &NewWord) -> RepoResult<WordId>;
    /// Lists all words with the annotation of type `extra` as decoration.
    fn list_words(&self, extra: &str) -> RepoResult<Vec<WordEntry>>;
    /// Finds one word by (normalized) text.
    fn find_word(&self, text: &str) -> RepoResult<Option<Word>>;
    /// Returns every annotation of one word, sorted by type.
    fn annotations(&self, word_id: WordId) -> RepoResult<Vec<Annotation>>;
}

/// SQLite-backed vocabulary repository.
pub struct SqliteVocabularyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteVocabularyRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable` when the schema is not in place.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl VocabularyRepository for SqliteVocabularyRepository<'_> {
    fn save_word(&mut self, word: &NewWord) -> RepoResult<WordId> {
        word.validate()?;
        let started_at = Instant::now();

        let result = save_word_in_tx(self.conn, word);
        match &result {
            Ok(word_id) => info!(
                "event=word_save module=repo status=ok word_id={} annotations={} duration_ms={}",
                word_id,
                word.annotations.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=word_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn list_words(&self, extra: &str) -> RepoResult<Vec<WordEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                v.id,
                v.word,
                i.text AS decoration
             FROM vocabulary v
             LEFT JOIN vocabulary_info i
               ON i.word_id = v.id
              AND i.type = ?1
             ORDER BY v.id ASC;",
        )?;

        let mut rows = stmt.query([extra])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(WordEntry {
                word: Word {
                    id: row.get("id")?,
                    text: row.get("word")?,
                },
                decoration: row.get("decoration")?,
            });
        }

        Ok(entries)
    }

    fn find_word(&self, text: &str) -> RepoResult<Option<Word>> {
        let normalized = normalize_word(text);
        let mut stmt = self
            .conn
            .prepare("SELECT id, word FROM vocabulary WHERE word = ?1;")?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Word {
                id: row.get("id")?,
                text: row.get("word")?,
            }));
        }

        Ok(None)
    }

    fn annotations(&self, word_id: WordId) -> RepoResult<Vec<Annotation>> {
        let mut stmt = self.conn.prepare(
            "SELECT type, text
             FROM vocabulary_info
             WHERE word_id = ?1
             ORDER BY type ASC;",
        )?;
        let mut rows = stmt.query([word_id])?;
        let mut annotations = Vec::new();
        while let Some(row) = rows.next()? {
            annotations.push(Annotation {
                kind: row.get("type")?,
                text: row.get("text")?,
            });
        }
        Ok(annotations)
    }
}

fn save_word_in_tx(conn: &mut Connection, word: &NewWord) -> RepoResult<WordId> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO vocabulary (word) VALUES (?1)
         ON CONFLICT (word) DO NOTHING;",
        [word.text.as_str()],
    )?;
    let word_id = word_id_in_tx(&tx, word.text.as_str())?;

    for annotation in &word.annotations {
        tx.execute(
            "INSERT INTO vocabulary_info (word_id, type, text) VALUES (?1, ?2, ?3)
             ON CONFLICT (word_id, type) DO UPDATE SET text = excluded.text;",
            params![word_id, annotation.kind.trim(), annotation.text.as_str()],
        )?;
    }

    tx.commit()?;
    Ok(word_id)
}

fn word_id_in_tx(tx: &Transaction<'_>, text: &str) -> RepoResult<WordId> {
    let word_id = tx.query_row(
        "SELECT id FROM vocabulary WHERE word = ?1;",
        [text],
        |row| row.get(0),
    )?;
    Ok(word_id)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

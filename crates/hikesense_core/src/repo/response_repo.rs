//! Durable response storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four storage calls the store consumes: fetch all, insert,
//!   update, delete.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Rows hold exactly `id, text, score, confidence`; `id` is the key.
//! - `fetch_all` returns rows newest-first by insertion (`rowid DESC`).
//! - Write paths call `Response::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::response::{Response, ResponseId, ResponseValidationError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for response persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ResponseValidationError),
    Db(DbError),
    NotFound(ResponseId),
    InvalidData(String),
    /// Failure reported by a non-SQLite storage backend.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "response not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted response data: {message}")
            }
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Backend(_) => None,
        }
    }
}

impl From<ResponseValidationError> for RepoError {
    fn from(value: ResponseValidationError) -> Self {
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

/// Durable storage consumed by the response store.
///
/// Calls are blocking. The store runs each one on the blocking pool and never
/// issues two at once.
pub trait ResponseStorage: Send + Sync {
    /// Returns every persisted response, most recently inserted first.
    fn fetch_all(&self) -> RepoResult<Vec<Response>>;
    fn insert(&self, response: &Response) -> RepoResult<()>;
    /// Replaces text/score/confidence of the row keyed by `response.id`.
    ///
    /// Returns `NotFound` when no such row exists.
    fn update(&self, response: &Response) -> RepoResult<()>;
    /// Removes the row keyed by `id`. Returns whether a row was removed.
    fn delete(&self, id: ResponseId) -> RepoResult<bool>;
}

impl<S: ResponseStorage + ?Sized> ResponseStorage for Arc<S> {
    fn fetch_all(&self) -> RepoResult<Vec<Response>> {
        (**self).fetch_all()
    }

    fn insert(&self, response: &Response) -> RepoResult<()> {
        (**self).insert(response)
    }

    fn update(&self, response: &Response) -> RepoResult<()> {
        (**self).update(response)
    }

    fn delete(&self, id: ResponseId) -> RepoResult<bool> {
        (**self).delete(id)
    }
}

/// SQLite-backed response storage owning its connection.
pub struct SqliteResponseStorage {
    conn: Mutex<Connection>,
}

impl SqliteResponseStorage {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Number of persisted rows.
    pub fn count(&self) -> RepoResult<u64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM responses;", [], |row| {
            row.get::<_, i64>(0)
        })?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

impl ResponseStorage for SqliteResponseStorage {
    fn fetch_all(&self) -> RepoResult<Vec<Response>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, text, score, confidence
             FROM responses
             ORDER BY rowid DESC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next()? {
            responses.push(parse_response_row(row)?);
        }

        Ok(responses)
    }

    fn insert(&self, response: &Response) -> RepoResult<()> {
        response.validate()?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO responses (id, text, score, confidence)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                response.id.to_string(),
                response.text.as_str(),
                response.score,
                response.confidence,
            ],
        )?;

        Ok(())
    }

    fn update(&self, response: &Response) -> RepoResult<()> {
        response.validate()?;

        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE responses
             SET text = ?1, score = ?2, confidence = ?3
             WHERE id = ?4;",
            params![
                response.text.as_str(),
                response.score,
                response.confidence,
                response.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(response.id));
        }

        Ok(())
    }

    fn delete(&self, id: ResponseId) -> RepoResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM responses WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_response_row(row: &Row<'_>) -> RepoResult<Response> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in responses.id"))
    })?;

    let response = Response {
        id,
        text: row.get("text")?,
        score: row.get("score")?,
        confidence: row.get("confidence")?,
    };
    response.validate()?;
    Ok(response)
}

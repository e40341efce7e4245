//! SQLite adapter: Implementation of CredentialStore.
//!
//! Provides local persistence for accounts in a single `users` table.
//!
//! # Connection Behavior
//!
//! A connection is opened for every operation and closed when it returns.
//! Each operation is a single statement, so no transaction spans calls and
//! concurrent writers are serialized by SQLite's own file locking.
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::domain::UserRecord;
use crate::ports::{CredentialStore, InsertOutcome};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cannot open database {path}: {message}")]
    Open { path: String, message: String },
}

/// SQLite credential store.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    path: PathBuf,
}

impl SqliteCredentialStore {
    /// Create a store backed by the database file at `path`.
    ///
    /// The schema is created if missing.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the backing database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Connection::open(&self.path).map_err(|e| StorageError::Open {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE,
                password TEXT
            );
            ",
        )?;

        Ok(())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl CredentialStore for SqliteCredentialStore {
    type Error = StorageError;

    fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<InsertOutcome, Self::Error> {
        let conn = self.connect()?;

        match conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        ) {
            Ok(_) => {
                tracing::debug!("Inserted user row {}", conn.last_insert_rowid());
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    fn password_hash(&self, username: &str) -> Result<Option<String>, Self::Error> {
        let conn = self.connect()?;

        let hash = conn
            .query_row(
                "SELECT password FROM users WHERE username = ?1",
                params![username],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;

        // A NULL password column never matches.
        Ok(hash.flatten())
    }

    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, Self::Error> {
        let conn = self.connect()?;

        let record = conn
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn count_users(&self) -> Result<usize, Self::Error> {
        let conn = self.connect()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}

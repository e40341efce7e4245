//! Credential store port: Trait for persistent account storage.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.

use crate::domain::UserRecord;

/// Outcome of inserting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row written
    Inserted,
    /// Username already taken; nothing written
    Duplicate,
}

/// Trait for local account storage.
///
/// Usernames are unique. Rows are never updated or deleted.
pub trait CredentialStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a new account.
    ///
    /// # Returns
    /// `InsertOutcome::Duplicate` if the username already exists.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn insert_user(&self, username: &str, password_hash: &str)
        -> Result<InsertOutcome, Self::Error>;

    /// Look up the stored password hash for a username.
    ///
    /// # Returns
    /// `None` if no such user exists.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn password_hash(&self, username: &str) -> Result<Option<String>, Self::Error>;

    /// Load a full account row.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, Self::Error>;

    /// Count all accounts.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn count_users(&self) -> Result<usize, Self::Error>;
}

//! Auth service: Account registration and login.
//!
//! Every failure reaches the UI as a plain `false`; the `try_*` variants keep
//! the cause for logging. "Unknown user" and "wrong password" are never
//! distinguished to the caller.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::adapters::StorageError;
use crate::domain::kdf::{self, KdfError, KdfParams};
use crate::domain::validate_username;
use crate::ports::{CredentialStore, InsertOutcome};

/// Errors from account operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Password hashing failed: {0}")]
    Kdf(#[from] KdfError),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),
}

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
}

/// Service for account registration and credential checks.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    params: KdfParams,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
    S::Error: Into<StorageError>,
{
    /// Create a service with the default Argon2id cost.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_params(store, KdfParams::default())
    }

    /// Create a service with custom Argon2id cost parameters.
    pub fn with_params(store: Arc<S>, params: KdfParams) -> Self {
        Self { store, params }
    }

    /// Register a new account.
    ///
    /// # Errors
    /// Returns error if the username is blank, hashing fails or storage fails.
    pub fn try_register(&self, username: &str, password: &str) -> Result<RegisterOutcome, AuthError> {
        validate_username(username).map_err(AuthError::InvalidUsername)?;

        let hash = Zeroizing::new(kdf::hash_password(password, &self.params)?);
        let outcome = self
            .store
            .insert_user(username, hash.as_str())
            .map_err(|e| AuthError::Storage(e.into()))?;

        Ok(match outcome {
            InsertOutcome::Inserted => {
                tracing::info!("Registered new account");
                RegisterOutcome::Created
            }
            InsertOutcome::Duplicate => {
                tracing::info!("Registration rejected: username taken");
                RegisterOutcome::UsernameTaken
            }
        })
    }

    /// Register a new account; `true` only if a row was written.
    pub fn register(&self, username: &str, password: &str) -> bool {
        match self.try_register(username, password) {
            Ok(outcome) => outcome == RegisterOutcome::Created,
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                false
            }
        }
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    /// Returns error only if storage fails.
    pub fn try_login(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let stored = self
            .store
            .password_hash(username)
            .map_err(|e| AuthError::Storage(e.into()))?;

        let ok = match stored {
            Some(hash) => kdf::verify_password(password, &hash),
            None => false,
        };

        if ok {
            tracing::info!("Login succeeded");
        } else {
            tracing::info!("Login rejected");
        }
        Ok(ok)
    }

    /// Check a username/password pair; any failure is `false`.
    pub fn login(&self, username: &str, password: &str) -> bool {
        self.try_login(username, password).unwrap_or_else(|e| {
            tracing::warn!("Login failed: {}", e);
            false
        })
    }

    /// Number of registered accounts.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn account_count(&self) -> Result<usize, AuthError> {
        self.store
            .count_users()
            .map_err(|e| AuthError::Storage(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteCredentialStore;
    use tempfile::{tempdir, TempDir};

    fn service() -> (TempDir, Arc<SqliteCredentialStore>, AuthService<SqliteCredentialStore>) {
        let temp = tempdir().expect("tempdir");
        let store = Arc::new(
            SqliteCredentialStore::new(temp.path().join("users.db")).expect("Should create db"),
        );
        let auth = AuthService::with_params(store.clone(), KdfParams::new(1024, 1, 1));
        (temp, store, auth)
    }

    #[test]
    fn test_register_and_login_scenario() {
        let (_temp, _store, auth) = service();

        assert!(auth.register("alice", "secret123"));
        assert!(auth.login("alice", "secret123"));
        assert!(!auth.login("alice", "wrong"));
        assert!(!auth.login("bob", "x"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let (_temp, store, auth) = service();

        assert!(auth.register("alice", "secret123"));
        assert!(!auth.register("alice", "other"));
        assert_eq!(
            auth.try_register("alice", "again").expect("Should not error"),
            RegisterOutcome::UsernameTaken
        );

        assert_eq!(store.count_users().expect("Should count"), 1);
        // The first registration's password still wins.
        assert!(auth.login("alice", "secret123"));
        assert!(!auth.login("alice", "other"));
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let (_temp, store, auth) = service();

        assert!(auth.register("alice", "secret123"));
        let record = store.find_user("alice").expect("Should query").expect("Should exist");
        assert!(record.password_hash.starts_with("$argon2id$"));
        assert!(!record.password_hash.contains("secret123"));
    }

    #[test]
    fn test_legacy_rows_still_log_in() {
        let (_temp, store, auth) = service();

        store
            .insert_user("carol", &kdf::legacy_digest("pa55"))
            .expect("Should insert");

        assert!(auth.login("carol", "pa55"));
        assert!(!auth.login("carol", "pa56"));
    }

    #[test]
    fn test_blank_username_rejected() {
        let (_temp, store, auth) = service();

        assert!(!auth.register("", "secret"));
        assert!(matches!(
            auth.try_register("  ", "secret"),
            Err(AuthError::InvalidUsername(_))
        ));
        assert_eq!(auth.account_count().expect("Should count"), 0);
        assert_eq!(store.count_users().expect("Should count"), 0);
    }

    #[test]
    fn test_empty_password_is_allowed() {
        let (_temp, _store, auth) = service();

        assert!(auth.register("dave", ""));
        assert!(auth.login("dave", ""));
        assert!(!auth.login("dave", " "));
    }
}

//! Account records.

use serde::{Deserialize, Serialize};

/// A stored account row.
///
/// Created on registration and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Auto-incremented row id
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Derived password hash (Argon2 PHC string or legacy SHA-256 hex)
    pub password_hash: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Check that a username can be registered.
///
/// # Errors
/// Returns a user-facing message if the name is blank.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let record = UserRecord {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".into(),
        };

        let rendered = format!("{record:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("argon2id"));
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
    }
}

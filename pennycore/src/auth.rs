//! User registration and password verification.
//!
//! Passwords are stored as `salt$hash` where the hash is SHA-256 over the
//! salt concatenated with the password. The salt is random per user.
//!
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::error::{PennyError, Result};
use crate::model::User;
use crate::store::{Store, user_from_row};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = hex(&rand::random::<[u8; 16]>());
    let digest = digest_with_salt(&salt, password);
    format!("{salt}${digest}")
}

/// Check a password against a stored `salt$hash` string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    digest_with_salt(salt, password) == digest
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex(&hasher.finalize())
}

impl Store {
    /// Register a user. Usernames are unique.
    pub fn register_user(&self, username: &str, password: &str) -> Result<User> {
        if username.trim().is_empty() {
            return Err(PennyError::invalid("username must not be empty"));
        }
        if self.user_by_name(username)?.is_some() {
            return Err(PennyError::Conflict("username already registered".to_string()));
        }
        let password_hash = hash_password(password);
        self.conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash,
        })
    }

    pub fn user_by_name(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?)
    }

    /// Check a username/password pair against the stored hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        match self.user_by_name(username)? {
            Some(user) => Ok(verify_password(password, &user.password_hash)),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
        // Salts differ between hashes of the same password.
        assert_ne!(stored, hash_password("hunter2"));
    }

    #[test]
    fn register_rejects_duplicates() {
        let store = Store::open_in_memory().unwrap();
        let user = store.register_user("alice", "hunter2").unwrap();
        assert_eq!(user.username, "alice");
        let err = store.register_user("alice", "other").unwrap_err();
        assert!(matches!(err, PennyError::Conflict(_)));
    }

    #[test]
    fn authenticate_checks_hash() {
        let store = Store::open_in_memory().unwrap();
        store.register_user("alice", "hunter2").unwrap();
        assert!(store.authenticate("alice", "hunter2").unwrap());
        assert!(!store.authenticate("alice", "wrong").unwrap());
        assert!(!store.authenticate("bob", "hunter2").unwrap());
    }
}
